//! 봇 실행.

use std::sync::Arc;

use anyhow::Context;
use signal_core::BotConfig;
use signal_notification::{SignalBot, TelegramClient, UpdatePoller};
use tracing::{error, info};

/// 설정으로 봇을 구성하고 Ctrl+C를 받을 때까지 폴링합니다.
pub async fn run_bot(config: BotConfig) -> anyhow::Result<()> {
    let client =
        Arc::new(TelegramClient::new(&config.telegram).context("텔레그램 클라이언트 생성 실패")?);
    let me = client.get_me().await.context("봇 정보 조회 실패 (getMe)")?;
    let username = me.username.context("봇 계정에 사용자 이름이 없습니다")?;
    let bot = Arc::new(
        SignalBot::from_config(Arc::clone(&client), &config)?.with_username(&username),
    );

    info!(
        bot = %username,
        admin_id = config.access.admin_id,
        all_recipients = config.destinations.all_recipients.len(),
        group_only = config.destinations.group_only.len(),
        symbols = config.signals.symbols.len(),
        "🚀 OTC signal bot is live"
    );

    UpdatePoller::new(client, bot)
        .run_until(shutdown_signal())
        .await;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("종료 신호 수신"),
        Err(e) => {
            error!(error = %e, "종료 신호 핸들러 등록 실패, 프로세스 종료 시까지 실행");
            std::future::pending::<()>().await;
        }
    }
}
