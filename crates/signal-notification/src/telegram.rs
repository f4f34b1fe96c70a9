//! 텔레그램 Bot API 클라이언트.
//!
//! 봇에 필요한 메서드만 구현합니다:
//! - `getMe` - 봇 사용자 이름 확인
//! - `getUpdates` - long polling으로 메시지/콜백 수신
//! - `sendMessage` - 텍스트 및 인라인 키보드 전송
//! - `answerCallbackQuery` - 버튼 클릭 확인

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use signal_core::TelegramSettings;
use tracing::{debug, warn};

use crate::types::{BotApi, NotificationError, NotificationResult, OutgoingMessage};

/// 429 응답에 `retry_after`가 없을 때 대기 시간 (초).
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// long polling 요청에 추가로 허용하는 네트워크 여유 시간.
const POLL_GRACE: Duration = Duration::from_secs(5);

/// Bot API 공통 응답.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

/// 개별 업데이트.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

/// 메시지 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

/// 사용자 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    /// 봇 계정은 항상 가지고 있음 (`getMe`)
    pub username: Option<String>,
}

/// 채팅 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// 인라인 버튼 콜백.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// 버튼이 붙어 있던 메시지 (오래된 메시지는 없을 수 있음)
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Serialize)]
struct GetUpdatesParams<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct AnswerCallbackParams<'a> {
    callback_query_id: &'a str,
}

/// 텔레그램 Bot API 클라이언트.
pub struct TelegramClient {
    bot_token: SecretString,
    api_base_url: String,
    poll_timeout: Duration,
    client: reqwest::Client,
}

impl TelegramClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(settings: &TelegramSettings) -> NotificationResult<Self> {
        let token = settings.bot_token.expose_secret();
        if token.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "봇 토큰이 비어 있습니다".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            bot_token: SecretString::from(token.to_string()),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            poll_timeout: settings.poll_timeout(),
            client,
        })
    }

    /// 메서드 URL. 토큰이 포함되므로 로그에 남기지 않습니다.
    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url,
            self.bot_token.expose_secret(),
            method
        )
    }

    /// Bot API 메서드를 호출하고 `result`를 반환합니다.
    async fn call<P, T>(
        &self,
        method: &str,
        params: &P,
        timeout: Option<Duration>,
    ) -> NotificationResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // 에러 메시지에 토큰이 들어간 URL이 노출되지 않도록 제거
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| e.without_url())?;
        let parsed = serde_json::from_slice::<ApiResponse<T>>(&bytes);

        // 상태 코드 우선 (프록시의 429 응답은 JSON이 아닐 수 있음)
        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || matches!(&parsed, Ok(body) if body.error_code == Some(429));
        if rate_limited {
            let retry_after = parsed
                .ok()
                .and_then(|body| body.parameters)
                .and_then(|p| p.retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(method, retry_after, "Telegram rate limited");
            return Err(NotificationError::RateLimited(retry_after));
        }

        let body = parsed.map_err(|e| {
            NotificationError::SendFailed(format!("{method}: HTTP {status} 응답 해석 실패: {e}"))
        })?;

        if !status.is_success() || !body.ok {
            return Err(NotificationError::SendFailed(format!(
                "{}: HTTP {}: {}",
                method,
                status,
                body.description.unwrap_or_default()
            )));
        }

        body.result.ok_or_else(|| {
            NotificationError::SendFailed(format!("{method}: 응답에 result가 없습니다"))
        })
    }

    /// 봇 계정 정보를 가져옵니다.
    ///
    /// 그룹에서 `/command@BotName` 형식의 수신 대상을 판별하는 데 사용합니다.
    pub async fn get_me(&self) -> NotificationResult<User> {
        let me: User = self.call("getMe", &serde_json::json!({}), None).await?;
        debug!(bot_id = me.id, username = ?me.username, "봇 정보 확인");
        Ok(me)
    }

    /// `offset` 이후의 업데이트를 long polling으로 가져옵니다.
    pub async fn get_updates(&self, offset: i64) -> NotificationResult<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message", "callback_query"],
        };

        let updates: Vec<Update> = self
            .call("getUpdates", &params, Some(self.poll_timeout + POLL_GRACE))
            .await?;

        debug!(offset, count = updates.len(), "업데이트 수신");
        Ok(updates)
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(&self, message: &OutgoingMessage) -> NotificationResult<()> {
        let _: IgnoredAny = self.call("sendMessage", message, None).await?;
        debug!(chat_id = %message.chat_id, "메시지 전송 완료");
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> NotificationResult<()> {
        let params = AnswerCallbackParams { callback_query_id };
        let _: IgnoredAny = self.call("answerCallbackQuery", &params, None).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
