//! 메시지 타입 및 전송 trait 정의.

use async_trait::async_trait;
use serde::Serialize;
use signal_core::{Destination, SignalError};

use crate::keyboard::InlineKeyboardMarkup;

/// 메시지 파싱 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// 레거시 Markdown (`*bold*`, `` `code` ``, `_italic_`)
    Markdown,
}

/// 전송할 메시지.
///
/// `sendMessage` 요청 본문으로 그대로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: Destination,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub disable_web_page_preview: bool,
}

impl OutgoingMessage {
    /// 일반 텍스트 메시지.
    pub fn text(chat_id: Destination, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
            disable_web_page_preview: true,
        }
    }

    /// Markdown 메시지.
    pub fn markdown(chat_id: Destination, text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::Markdown),
            ..Self::text(chat_id, text)
        }
    }

    /// 인라인 키보드를 첨부합니다.
    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// 권한 거부, 입력 검증 실패, 잘못된 토큰 등 도메인 에러
    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// 챗 플랫폼 전송 trait.
///
/// 봇 핸들러와 브로드캐스트 엔진은 이 trait에만 의존하므로 테스트에서
/// 메모리 기반 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// 메시지를 전송합니다.
    async fn send_message(&self, message: &OutgoingMessage) -> NotificationResult<()>;

    /// 버튼 콜백을 확인 처리합니다 (클라이언트의 로딩 표시 해제).
    async fn answer_callback_query(&self, callback_query_id: &str) -> NotificationResult<()>;

    /// 일반 텍스트를 단일 대상에게 전송합니다.
    async fn send_text(&self, chat_id: Destination, text: &str) -> NotificationResult<()> {
        self.send_message(&OutgoingMessage::text(chat_id, text)).await
    }

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_serialization_omits_optional_fields() {
        let message = OutgoingMessage::text(Destination(-100), "hello");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["chat_id"], -100);
        assert_eq!(json["text"], "hello");
        assert!(json.get("parse_mode").is_none());
        assert!(json.get("reply_markup").is_none());
    }

    #[test]
    fn test_markdown_serialization() {
        let message = OutgoingMessage::markdown(Destination(7), "*bold*");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["parse_mode"], "Markdown");
    }

    #[test]
    fn test_signal_error_is_transparent() {
        let err = NotificationError::from(SignalError::Unauthorized(1));
        assert!(matches!(err, NotificationError::Signal(SignalError::Unauthorized(1))));
        assert_eq!(err.to_string(), SignalError::Unauthorized(1).to_string());
    }
}
