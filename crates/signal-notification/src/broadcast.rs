//! 브로드캐스트 fan-out 엔진.
//!
//! 하나의 메시지를 여러 수신 대상에게 독립적으로 전송합니다.
//! 한 대상의 전송 실패는 로그를 남기고 실패 수로만 집계되며, 다음 대상의
//! 전송을 막지 않습니다. 재시도나 백오프는 없습니다 (최대 1회, best-effort).

use std::fmt;
use std::sync::Arc;

use signal_core::{Audience, Destination, SignalError, SignalResult};
use tracing::{debug, info, warn};

use crate::types::BotApi;

/// `/broadcast` 사용법 안내.
pub const BROADCAST_USAGE: &str = "❗ Usage: /broadcast <your message>";

/// `/groupbroadcast` 사용법 안내.
pub const GROUP_BROADCAST_USAGE: &str = "❗ Usage: /groupbroadcast <your message>";

/// 브로드캐스트 요청.
///
/// 렌더링된 본문과 대상 목록을 담습니다. 본문이 비어 있으면 생성되지 않으므로
/// 엔진은 빈 메시지를 전송하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub audience: Audience,
    pub body: String,
    pub destinations: Vec<Destination>,
}

impl BroadcastRequest {
    /// 관리자가 입력한 텍스트로 요청을 생성합니다.
    ///
    /// 텍스트가 비어 있으면 사용법 안내를 담은 `SignalError::Validation`을 반환합니다.
    pub fn new(audience: Audience, text: &str, destinations: &[Destination]) -> SignalResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SignalError::Validation(usage(audience).to_string()));
        }

        let header = match audience {
            Audience::AllRecipients => "📢 Broadcast:",
            Audience::GroupOnly => "📢 Group Signal:",
        };

        Ok(Self {
            audience,
            body: format!("{header}\n\n{text}"),
            destinations: destinations.to_vec(),
        })
    }
}

/// 대상 그룹별 사용법 안내.
pub fn usage(audience: Audience) -> &'static str {
    match audience {
        Audience::AllRecipients => BROADCAST_USAGE,
        Audience::GroupOnly => GROUP_BROADCAST_USAGE,
    }
}

/// 대상별 전송 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

/// 전송 결과 집계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastTally {
    pub delivered: usize,
    pub failed: usize,
}

impl BroadcastTally {
    /// 시도한 대상 수.
    pub fn total(&self) -> usize {
        self.delivered + self.failed
    }

    fn record(&mut self, outcome: &DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Delivered => self.delivered += 1,
            DeliveryOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// 관리자에게 보낼 요약 문구.
    pub fn summary(&self, audience: Audience) -> String {
        match audience {
            Audience::AllRecipients => {
                format!("✅ Sent to {} of {} chats.", self.delivered, self.total())
            }
            Audience::GroupOnly => format!(
                "✅ Group broadcast sent to {} of {} group(s).",
                self.delivered,
                self.total()
            ),
        }
    }
}

impl fmt::Display for BroadcastTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} delivered", self.delivered, self.total())
    }
}

/// 브로드캐스트 fan-out 엔진.
///
/// 호출 간 공유 상태가 없으므로 동시에 여러 브로드캐스트가 실행되어도
/// 서로의 집계에 영향을 주지 않습니다.
pub struct BroadcastEngine<A: BotApi> {
    api: Arc<A>,
}

impl<A: BotApi> Clone for BroadcastEngine<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: BotApi> BroadcastEngine<A> {
    /// 새 엔진을 생성합니다.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// 요청의 대상 순서대로 전송하고 결과를 집계합니다.
    ///
    /// 개별 전송 에러는 여기서 처리되며 호출자에게 전파되지 않습니다.
    pub async fn broadcast(&self, request: &BroadcastRequest) -> BroadcastTally {
        let mut tally = BroadcastTally::default();

        for &destination in &request.destinations {
            let outcome = self.deliver(destination, &request.body).await;
            tally.record(&outcome);
        }

        info!(
            audience = %request.audience,
            delivered = tally.delivered,
            failed = tally.failed,
            sender = self.api.name(),
            "브로드캐스트 완료"
        );

        tally
    }

    async fn deliver(&self, destination: Destination, body: &str) -> DeliveryOutcome {
        match self.api.send_text(destination, body).await {
            Ok(()) => {
                debug!(chat_id = %destination, "브로드캐스트 전송 성공");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                warn!(chat_id = %destination, error = %e, "브로드캐스트 전송 실패, 다음 대상으로 진행");
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
