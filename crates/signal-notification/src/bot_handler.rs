//! 텔레그램 봇 명령어 핸들러.
//!
//! 수신한 명령어와 버튼 콜백을 처리합니다.
//! - `/start` - 전체 통화쌍 시그널 버튼
//! - `/search <키워드>` - 통화쌍 검색
//! - `/getid` - 현재 채팅 ID 확인
//! - `/admin`, `/broadcast`, `/groupbroadcast` - 관리자 전용
//!
//! 각 핸들러는 도메인 에러(`SignalError`)를 `?`로 전파하고, `handle_event`가
//! 이를 사용자에게 보낼 응답 한 건으로 변환합니다. 어떤 에러도 이벤트
//! 처리 루프를 중단시키지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use signal_core::{
    AdminGate, AlertFormatter, Audience, BotConfig, Destination, Recipients, SignalError,
    SignalResult, SignalToken, SymbolRoster,
};
use tracing::{debug, error, info, warn};

use crate::broadcast::{BroadcastEngine, BroadcastRequest};
use crate::keyboard::InlineKeyboardMarkup;
use crate::telegram::Update;
use crate::types::{BotApi, NotificationError, NotificationResult, OutgoingMessage};

/// 관리자 전용 명령어 거부 응답.
pub const UNAUTHORIZED_REPLY: &str = "❌ You are not authorized to use this command.";

/// 디코딩할 수 없는 버튼 데이터 응답.
pub const MALFORMED_SIGNAL_REPLY: &str =
    "⚠️ This signal button is not valid anymore. Use /start to pick a pair again.";

/// `/search` 사용법 안내.
pub const SEARCH_USAGE: &str = "🔍 Use: /search usd";

/// 검색 결과 없음 응답.
pub const NO_MATCHES_REPLY: &str = "❌ No matches found.";

const BROWSE_HEADER: &str =
    "💵 *All OTC Currency Pairs*\nTap to send signal:\n\nUse /search usd to filter.";

const ADMIN_PANEL: &str = "🔐 Admin Panel:\n\
     /broadcast <msg> – Send to all users\n\
     /groupbroadcast <msg> – Send to group only";

/// 봇 명령어 타입.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// 전체 통화쌍 목록
    Start,
    /// 통화쌍 검색
    Search { keyword: Option<String> },
    /// 관리자 패널
    Admin,
    /// 전체 수신자 브로드캐스트
    Broadcast { text: String },
    /// 그룹 브로드캐스트
    GroupBroadcast { text: String },
    /// 현재 채팅 ID
    GetId,
    /// 알 수 없는 명령어
    Unknown(String),
}

impl BotCommand {
    /// 텍스트에서 명령어 파싱.
    ///
    /// `/`로 시작하지 않는 일반 텍스트는 `None`입니다. 명령어 이름은 대소문자를
    /// 구분하지 않습니다. 그룹에서 쓰이는 `/command@BotName` 형식은 `BotName`이
    /// `bot_username`과 같을 때만 (대소문자 무시) 명령어로 취급하고, 다른 봇을
    /// 향한 명령어는 `None`입니다. `bot_username`을 모르면 수신 대상을 확인하지
    /// 않습니다.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;

        let (head, rest) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim()),
            None => (body, ""),
        };

        let name = match head.split_once('@') {
            Some((name, addressee)) => {
                if let Some(own) = bot_username {
                    if !addressee.eq_ignore_ascii_case(own.trim_start_matches('@')) {
                        return None;
                    }
                }
                name
            }
            None => head,
        }
        .to_lowercase();

        let command = match name.as_str() {
            "start" => BotCommand::Start,
            "search" => BotCommand::Search {
                keyword: rest.split_whitespace().next().map(str::to_string),
            },
            "admin" => BotCommand::Admin,
            "broadcast" => BotCommand::Broadcast {
                text: rest.to_string(),
            },
            "groupbroadcast" => BotCommand::GroupBroadcast {
                text: rest.to_string(),
            },
            "getid" => BotCommand::GetId,
            _ => BotCommand::Unknown(text.to_string()),
        };

        Some(command)
    }

    /// 관리자 전용 명령어인지 확인합니다.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            BotCommand::Admin | BotCommand::Broadcast { .. } | BotCommand::GroupBroadcast { .. }
        )
    }
}

/// 분류된 수신 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// 명령어 메시지
    Command {
        chat_id: Destination,
        user_id: i64,
        command: BotCommand,
    },
    /// 인라인 버튼 클릭
    Interaction {
        callback_id: String,
        /// 버튼이 있던 채팅 (메시지가 너무 오래되면 없음)
        chat_id: Option<Destination>,
        user_id: i64,
        data: Option<String>,
    },
}

impl InboundEvent {
    /// 업데이트를 이벤트로 분류합니다. 처리할 필요가 없는 업데이트는 `None`.
    ///
    /// `bot_username`은 `BotCommand::parse`의 수신 대상 확인에 사용됩니다.
    pub fn from_update(update: Update, bot_username: Option<&str>) -> Option<Self> {
        if let Some(query) = update.callback_query {
            return Some(InboundEvent::Interaction {
                callback_id: query.id,
                chat_id: query.message.map(|m| Destination(m.chat.id)),
                user_id: query.from.id,
                data: query.data,
            });
        }

        let message = update.message?;
        let user = message.from?;
        let command = BotCommand::parse(message.text.as_deref()?, bot_username)?;

        Some(InboundEvent::Command {
            chat_id: Destination(message.chat.id),
            user_id: user.id,
            command,
        })
    }

    /// 응답을 보낼 채팅.
    pub fn reply_chat(&self) -> Option<Destination> {
        match self {
            InboundEvent::Command { chat_id, .. } => Some(*chat_id),
            InboundEvent::Interaction { chat_id, .. } => *chat_id,
        }
    }
}

/// 알림 시각 공급자.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// 시그널 봇.
///
/// 고정 설정(관리자, 수신자, 심볼, 포맷터)을 생성 시점에 받고 이후 변경하지
/// 않습니다. 이벤트 간 공유되는 가변 상태가 없으므로 `Arc`로 감싸 여러
/// 태스크에서 동시에 호출할 수 있습니다.
pub struct SignalBot<A: BotApi> {
    api: Arc<A>,
    gate: AdminGate,
    recipients: Recipients,
    roster: SymbolRoster,
    formatter: AlertFormatter,
    engine: BroadcastEngine<A>,
    clock: Clock,
    username: Option<String>,
}

impl<A: BotApi> SignalBot<A> {
    /// 새 봇을 생성합니다.
    pub fn new(
        api: Arc<A>,
        gate: AdminGate,
        recipients: Recipients,
        roster: SymbolRoster,
        formatter: AlertFormatter,
    ) -> Self {
        Self {
            engine: BroadcastEngine::new(Arc::clone(&api)),
            api,
            gate,
            recipients,
            roster,
            formatter,
            clock: Arc::new(Utc::now),
            username: None,
        }
    }

    /// 검증된 설정에서 봇을 생성합니다.
    pub fn from_config(api: Arc<A>, config: &BotConfig) -> SignalResult<Self> {
        Ok(Self::new(
            api,
            config.admin_gate(),
            config.recipients()?,
            config.roster(),
            config.alert_formatter()?,
        ))
    }

    /// 알림 시각 공급자를 교체합니다.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// 봇 사용자 이름을 설정합니다 (`getMe` 결과).
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// 봇 사용자 이름. 다른 봇을 향한 명령어를 거르는 데 사용합니다.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// 이벤트 하나를 처리합니다.
    ///
    /// 에러는 여기서 모두 처리됩니다. 사용자에게 알려야 하는 에러는 응답 한
    /// 건으로 변환되고 나머지는 로그로만 남깁니다.
    pub async fn handle_event(&self, event: InboundEvent) {
        let reply_chat = event.reply_chat();

        let result = match event {
            InboundEvent::Command {
                chat_id,
                user_id,
                command,
            } => self.execute_command(chat_id, user_id, command).await,
            InboundEvent::Interaction {
                callback_id,
                chat_id,
                user_id,
                data,
            } => {
                self.handle_interaction(&callback_id, chat_id, user_id, data.as_deref())
                    .await
            }
        };

        if let Err(err) = result {
            self.report_failure(reply_chat, err).await;
        }
    }

    /// 명령어 실행.
    async fn execute_command(
        &self,
        chat_id: Destination,
        user_id: i64,
        command: BotCommand,
    ) -> NotificationResult<()> {
        debug!(chat_id = %chat_id, user_id, command = ?command, "명령어 수신");

        match command {
            BotCommand::Start => self.handle_start(chat_id).await,
            BotCommand::Search { keyword } => self.handle_search(chat_id, keyword.as_deref()).await,
            BotCommand::GetId => self.handle_get_id(chat_id).await,
            BotCommand::Admin => self.handle_admin(chat_id, user_id).await,
            BotCommand::Broadcast { text } => {
                self.handle_broadcast(chat_id, user_id, Audience::AllRecipients, &text)
                    .await
            }
            BotCommand::GroupBroadcast { text } => {
                self.handle_broadcast(chat_id, user_id, Audience::GroupOnly, &text)
                    .await
            }
            BotCommand::Unknown(text) => {
                debug!(chat_id = %chat_id, text = %text, "알 수 없는 명령어 무시");
                Ok(())
            }
        }
    }

    /// `/start` - 전체 통화쌍 버튼.
    async fn handle_start(&self, chat_id: Destination) -> NotificationResult<()> {
        let keyboard =
            InlineKeyboardMarkup::signal_buttons(self.roster.symbols().iter().map(String::as_str));

        self.api
            .send_message(&OutgoingMessage::markdown(chat_id, BROWSE_HEADER).with_keyboard(keyboard))
            .await
    }

    /// `/search <키워드>` - 키워드를 포함하는 통화쌍만 버튼으로 표시.
    async fn handle_search(
        &self,
        chat_id: Destination,
        keyword: Option<&str>,
    ) -> NotificationResult<()> {
        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SignalError::Validation(SEARCH_USAGE.to_string()))?;

        let matches = self.roster.filter(keyword);
        if matches.is_empty() {
            return self.api.send_text(chat_id, NO_MATCHES_REPLY).await;
        }

        // 레거시 Markdown 코드 구간은 백틱을 이스케이프할 수 없음
        let shown = keyword.to_uppercase().replace('`', "");
        let header = format!("🔍 *Filtered by:* `{shown}`");

        self.api
            .send_message(
                &OutgoingMessage::markdown(chat_id, header)
                    .with_keyboard(InlineKeyboardMarkup::signal_buttons(matches)),
            )
            .await
    }

    /// `/getid` - 운영자 설정용 채팅 ID 확인.
    async fn handle_get_id(&self, chat_id: Destination) -> NotificationResult<()> {
        self.api
            .send_message(&OutgoingMessage::markdown(
                chat_id,
                format!("🆔 Chat ID: `{chat_id}`"),
            ))
            .await
    }

    /// `/admin` - 관리자 명령어 안내.
    async fn handle_admin(&self, chat_id: Destination, user_id: i64) -> NotificationResult<()> {
        self.gate.ensure_admin(user_id)?;

        self.api.send_text(chat_id, ADMIN_PANEL).await
    }

    /// `/broadcast`, `/groupbroadcast` - 수신자 목록으로 fan-out 후 요약 응답.
    async fn handle_broadcast(
        &self,
        chat_id: Destination,
        user_id: i64,
        audience: Audience,
        text: &str,
    ) -> NotificationResult<()> {
        self.gate.ensure_admin(user_id)?;

        let request =
            BroadcastRequest::new(audience, text, self.recipients.for_audience(audience))?;
        let tally = self.engine.broadcast(&request).await;

        self.api.send_text(chat_id, &tally.summary(audience)).await
    }

    /// 버튼 클릭 - 토큰을 디코딩해 알림을 응답.
    async fn handle_interaction(
        &self,
        callback_id: &str,
        chat_id: Option<Destination>,
        user_id: i64,
        data: Option<&str>,
    ) -> NotificationResult<()> {
        // 클라이언트 로딩 표시 해제. 실패해도 알림은 계속 진행
        if let Err(e) = self.api.answer_callback_query(callback_id).await {
            warn!(callback_id, error = %e, "콜백 응답 실패");
        }

        let token = SignalToken::decode(data.unwrap_or_default())?;

        let Some(chat_id) = chat_id else {
            warn!(user_id, token = %token, "응답할 채팅이 없는 콜백, 무시");
            return Ok(());
        };

        let alert = self.formatter.format(&token, (self.clock)());
        info!(
            chat_id = %chat_id,
            user_id,
            symbol = %token.symbol,
            direction = %token.direction,
            "시그널 알림 전송"
        );

        self.api
            .send_message(&OutgoingMessage::markdown(chat_id, alert))
            .await
    }

    /// 핸들러 에러를 사용자 응답 또는 로그로 변환합니다.
    async fn report_failure(&self, reply_chat: Option<Destination>, err: NotificationError) {
        let reply = match &err {
            NotificationError::Signal(signal_err) => {
                warn!(error = %signal_err, "요청 거부");
                user_reply(signal_err)
            }
            transport_err => {
                error!(error = %transport_err, "이벤트 처리 실패");
                None
            }
        };

        if let (Some(chat_id), Some(text)) = (reply_chat, reply) {
            if let Err(e) = self.api.send_text(chat_id, &text).await {
                error!(chat_id = %chat_id, error = %e, "에러 응답 전송 실패");
            }
        }
    }
}

/// 도메인 에러에 대한 사용자 응답 문구.
pub fn user_reply(err: &SignalError) -> Option<String> {
    match err {
        SignalError::Unauthorized(_) => Some(UNAUTHORIZED_REPLY.to_string()),
        SignalError::Validation(usage) => Some(usage.clone()),
        SignalError::MalformedToken { .. } => Some(MALFORMED_SIGNAL_REPLY.to_string()),
        SignalError::Config(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_command() {
        assert_eq!(BotCommand::parse("/start", None), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("  /START  ", None), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/start@OtcSignalBot", None), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_addressed_command() {
        let own = Some("OtcSignalBot");

        assert_eq!(
            BotCommand::parse("/start@otcsignalbot", own),
            Some(BotCommand::Start)
        );
        assert_eq!(
            BotCommand::parse("/broadcast@OtcSignalBot hello", own),
            Some(BotCommand::Broadcast {
                text: "hello".to_string()
            })
        );
        assert_eq!(BotCommand::parse("/start", own), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_ignores_command_for_other_bot() {
        let own = Some("OtcSignalBot");

        assert_eq!(BotCommand::parse("/broadcast@SomeOtherBot hello", own), None);
        assert_eq!(BotCommand::parse("/start@SomeOtherBot", own), None);
        assert_eq!(BotCommand::parse("/getid@", own), None);
    }

    #[test]
    fn test_parse_search_command() {
        assert_eq!(
            BotCommand::parse("/search usd", None),
            Some(BotCommand::Search {
                keyword: Some("usd".to_string())
            })
        );
        assert_eq!(
            BotCommand::parse("/search usd jpy", None),
            Some(BotCommand::Search {
                keyword: Some("usd".to_string())
            })
        );
        assert_eq!(
            BotCommand::parse("/search", None),
            Some(BotCommand::Search { keyword: None })
        );
    }

    #[test]
    fn test_parse_broadcast_keeps_message_body() {
        assert_eq!(
            BotCommand::parse("/broadcast Market opens\nin 5 minutes", None),
            Some(BotCommand::Broadcast {
                text: "Market opens\nin 5 minutes".to_string()
            })
        );
        assert_eq!(
            BotCommand::parse("/groupbroadcast@OtcSignalBot   hi  ", None),
            Some(BotCommand::GroupBroadcast {
                text: "hi".to_string()
            })
        );
        assert_eq!(
            BotCommand::parse("/broadcast", None),
            Some(BotCommand::Broadcast {
                text: String::new()
            })
        );
    }

    #[test]
    fn test_parse_admin_and_getid() {
        assert_eq!(BotCommand::parse("/admin", None), Some(BotCommand::Admin));
        assert_eq!(BotCommand::parse("/getid", None), Some(BotCommand::GetId));
    }

    #[test]
    fn test_parse_unknown_and_plain_text() {
        assert!(matches!(
            BotCommand::parse("/portfolio", None),
            Some(BotCommand::Unknown(_))
        ));
        assert_eq!(BotCommand::parse("hello there", None), None);
        assert_eq!(BotCommand::parse("", None), None);
    }

    #[test]
    fn test_privileged_commands() {
        assert!(BotCommand::Admin.is_privileged());
        assert!(BotCommand::Broadcast {
            text: String::new()
        }
        .is_privileged());
        assert!(!BotCommand::Start.is_privileged());
        assert!(!BotCommand::GetId.is_privileged());
    }

    #[test]
    fn test_user_reply_mapping() {
        assert_eq!(
            user_reply(&SignalError::Unauthorized(1)).as_deref(),
            Some(UNAUTHORIZED_REPLY)
        );
        assert_eq!(
            user_reply(&SignalError::Validation(SEARCH_USAGE.to_string())).as_deref(),
            Some(SEARCH_USAGE)
        );
        assert_eq!(
            user_reply(&SignalError::malformed("x", "구분자 없음")).as_deref(),
            Some(MALFORMED_SIGNAL_REPLY)
        );
        assert_eq!(user_reply(&SignalError::Config("x".to_string())), None);
    }

    #[test]
    fn test_event_from_command_update() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 1, "message": {"message_id": 5, "from": {"id": 9},
                "chat": {"id": -1001}, "text": "/getid"}}"#,
        )
        .unwrap();

        assert_eq!(
            InboundEvent::from_update(update, None),
            Some(InboundEvent::Command {
                chat_id: Destination(-1001),
                user_id: 9,
                command: BotCommand::GetId,
            })
        );
    }

    #[test]
    fn test_event_ignores_command_for_other_bot() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 4, "message": {"message_id": 5, "from": {"id": 6352552205},
                "chat": {"id": -1002861471371}, "text": "/groupbroadcast@SomeOtherBot hi"}}"#,
        )
        .unwrap();

        assert_eq!(InboundEvent::from_update(update, Some("OtcSignalBot")), None);
    }

    #[test]
    fn test_event_ignores_plain_text_and_missing_sender() {
        let plain: Update = serde_json::from_str(
            r#"{"update_id": 2, "message": {"message_id": 5, "from": {"id": 9},
                "chat": {"id": 9}, "text": "hi"}}"#,
        )
        .unwrap();
        assert_eq!(InboundEvent::from_update(plain, None), None);

        let anonymous: Update = serde_json::from_str(
            r#"{"update_id": 3, "message": {"message_id": 5,
                "chat": {"id": 9}, "text": "/start"}}"#,
        )
        .unwrap();
        assert_eq!(InboundEvent::from_update(anonymous, None), None);
    }
}
