//! 통합 테스트 공용 도우미

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use signal_core::{AdminGate, AlertFormatter, Destination, Recipients, SymbolRoster};
use signal_notification::{
    BotApi, NotificationError, NotificationResult, OutgoingMessage, SignalBot,
};

pub const ADMIN: i64 = 6352552205;
pub const PERSONAL: Destination = Destination(6352552205);
pub const GROUP: Destination = Destination(-1002861471371);

/// 전송 요청을 기록하는 메모리 기반 `BotApi`.
///
/// `failing`에 있는 대상으로의 전송은 항상 실패합니다.
#[derive(Default)]
pub struct RecordingApi {
    sent: Mutex<Vec<OutgoingMessage>>,
    answered: Mutex<Vec<String>>,
    failing: HashSet<Destination>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(destinations: &[Destination]) -> Self {
        Self {
            failing: destinations.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// 성공한 전송 목록 (실패한 시도는 포함하지 않음).
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: Destination) -> Vec<OutgoingMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .collect()
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotApi for RecordingApi {
    async fn send_message(&self, message: &OutgoingMessage) -> NotificationResult<()> {
        if self.failing.contains(&message.chat_id) {
            return Err(NotificationError::SendFailed(format!(
                "HTTP 403 Forbidden: bot was blocked by {}",
                message.chat_id
            )));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> NotificationResult<()> {
        self.answered
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn roster(symbols: &[&str]) -> SymbolRoster {
    SymbolRoster::new(symbols.iter().map(|s| s.to_string()).collect())
}

pub fn recipients() -> Recipients {
    Recipients::new(vec![PERSONAL, GROUP], vec![GROUP]).unwrap()
}

/// 고정 시각(15:07 UTC)을 쓰는 테스트 봇.
pub fn bot(api: Arc<RecordingApi>, recipients: Recipients) -> SignalBot<RecordingApi> {
    SignalBot::new(
        api,
        AdminGate::new(ADMIN),
        recipients,
        roster(&["USD/CAD", "EUR/GBP", "EUR/USD"]),
        AlertFormatter::default(),
    )
    .with_clock(Arc::new(|| {
        Utc.with_ymd_and_hms(2025, 7, 14, 15, 7, 0).unwrap()
    }))
}
