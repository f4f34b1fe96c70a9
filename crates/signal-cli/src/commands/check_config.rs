//! 설정 검증.

use signal_core::BotConfig;

/// 검증된 설정 요약과 토큰을 가린 TOML을 생성합니다.
pub fn describe_config(config: &BotConfig) -> anyhow::Result<String> {
    let recipients = config.recipients()?;
    let formatter = config.alert_formatter()?;

    let mut out = String::new();
    out.push_str("✅ 설정이 유효합니다\n");
    out.push_str(&format!("  관리자 ID      : {}\n", config.access.admin_id));
    out.push_str(&format!("  전체 수신자    : {}\n", join(recipients.all())));
    out.push_str(&format!("  그룹 전용      : {}\n", join(recipients.group_only())));
    out.push_str(&format!("  심볼 수        : {}\n", config.signals.symbols.len()));
    out.push_str(&format!("  알림 시간대    : {}\n", formatter.timezone()));
    out.push('\n');
    out.push_str(&config.to_redacted_toml()?);

    Ok(out)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "(없음)".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_config() {
        let config = BotConfig::from_toml_str(
            r#"
            [telegram]
            bot_token = "1:SECRET"

            [access]
            admin_id = 7

            [destinations]
            all_recipients = [7, -100]
            group_only = [-100]
            "#,
        )
        .unwrap();

        let text = describe_config(&config).unwrap();
        assert!(text.contains("7, -100"));
        assert!(text.contains("UTC"));
        assert!(!text.contains("1:SECRET"));
    }
}
