//! 설정 파일 로드 통합 테스트

use std::io::Write;

use signal_core::{Audience, BotConfig, Destination, SignalError};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        [telegram]
        bot_token = "42:FILE"
        poll_timeout_secs = 50

        [access]
        admin_id = 7

        [destinations]
        all_recipients = [7, -1001]
        group_only = [-1001]

        [signals]
        symbols = ["USD/CAD", "EUR/GBP"]
        timeframe = "3 Minutes"
        timezone = "Asia/Dhaka"

        [logging]
        level = "debug"
        format = "compact"
        "#,
    );

    let config = BotConfig::load(file.path()).unwrap();

    assert_eq!(config.telegram.poll_timeout_secs, 50);
    assert_eq!(config.admin_gate().admin_id(), 7);
    assert_eq!(config.roster().filter("usd"), vec!["USD/CAD"]);
    assert_eq!(
        config.recipients().unwrap().for_audience(Audience::AllRecipients),
        &[Destination(7), Destination(-1001)]
    );
    assert_eq!(config.alert_formatter().unwrap().timezone(), chrono_tz::Asia::Dhaka);
}

#[test]
fn test_load_rejects_invalid_file() {
    let file = write_config(
        r#"
        [telegram]
        bot_token = "42:FILE"

        [access]
        admin_id = 7

        [destinations]
        all_recipients = [7]
        group_only = [-1001]
        "#,
    );

    assert!(matches!(
        BotConfig::load(file.path()),
        Err(SignalError::Config(_))
    ));
}
