//! 설정 관리.
//!
//! 이 모듈은 봇 설정을 정의하고 로드합니다. 설정은 프로세스 시작 시 한 번
//! 로드되고 검증되며 이후 변경되지 않습니다.
//!
//! 로드 순서 (뒤가 우선):
//! 1. 구조체 기본값
//! 2. `TELEGRAM_BOT_TOKEN` 환경 변수 (토큰 기본값)
//! 3. TOML 설정 파일 (없어도 됨)
//! 4. `SIGNAL_BOT__` 접두사 환경 변수 (예: `SIGNAL_BOT__ACCESS__ADMIN_ID`)

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::domain::{
    AdminGate, AlertFormatter, Destination, Direction, Recipients, SignalToken, SymbolRoster,
    CALLBACK_DATA_LIMIT, DEFAULT_SYMBOLS, DEFAULT_TIMEFRAME, TOKEN_SEPARATOR,
};
use crate::error::{SignalError, SignalResult};
use crate::logging::LogFormat;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "SIGNAL_BOT";

/// 텔레그램 Bot API 기본 URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// 봇 설정.
#[derive(Debug, Deserialize, Serialize)]
pub struct BotConfig {
    /// 텔레그램 연결 설정
    #[serde(default)]
    pub telegram: TelegramSettings,
    /// 관리자 설정
    pub access: AccessConfig,
    /// 브로드캐스트 수신자
    pub destinations: DestinationConfig,
    /// 시그널 설정
    #[serde(default)]
    pub signals: SignalSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 텔레그램 연결 설정.
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramSettings {
    /// @BotFather에서 받은 봇 토큰 (직렬화 시 가려짐)
    #[serde(
        default = "empty_secret",
        deserialize_with = "deserialize_secret",
        serialize_with = "serialize_redacted"
    )]
    pub bot_token: SecretString,
    /// Bot API 기본 URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// long polling 대기 시간 (초)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// 일반 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: empty_secret(),
            api_base_url: default_api_base_url(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TelegramSettings {
    /// long polling 대기 시간.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// 일반 요청 타임아웃.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 관리자 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
    /// 권한 명령을 실행할 수 있는 유일한 사용자 ID
    pub admin_id: i64,
}

/// 브로드캐스트 수신자 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// `/broadcast` 대상 (개인 + 그룹)
    #[serde(deserialize_with = "deserialize_destinations")]
    pub all_recipients: Vec<Destination>,
    /// `/groupbroadcast` 대상. all_recipients의 부분집합이어야 함
    #[serde(default, deserialize_with = "deserialize_destinations")]
    pub group_only: Vec<Destination>,
}

/// 시그널 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalSettings {
    /// 버튼으로 노출할 심볼 목록
    #[serde(default = "default_symbols", deserialize_with = "deserialize_symbols")]
    pub symbols: Vec<String>,
    /// 알림에 표시할 타임프레임 라벨
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// 알림 시각 표시 시간대 (IANA 이름, 예: "Asia/Dhaka")
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            timeframe: default_timeframe(),
            timezone: default_timezone(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// 정수, 문자열 또는 그 배열을 수신자 목록으로 역직렬화.
///
/// 환경 변수로 값을 하나만 지정하면 (`SIGNAL_BOT__DESTINATIONS__GROUP_ONLY=-100`)
/// 배열이 아닌 정수로 들어옵니다.
fn deserialize_destinations<'de, D>(deserializer: D) -> Result<Vec<Destination>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(|item| chat_id(item).map(Destination).map_err(D::Error::custom))
            .collect(),
        scalar => chat_id(&scalar)
            .map(|id| vec![Destination(id)])
            .map_err(D::Error::custom),
    }
}

fn chat_id(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("채팅 ID는 정수여야 합니다: {n}")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("채팅 ID는 정수여야 합니다: {s:?}")),
        other => Err(format!("채팅 ID는 정수여야 합니다: {other}")),
    }
}

/// 문자열 또는 문자열 배열을 심볼 목록으로 역직렬화.
fn deserialize_symbols<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!(
                    "signals.symbols에 문자열이 아닌 값이 있습니다: {other}"
                ))),
            })
            .collect(),
        _ => Err(D::Error::custom(
            "signals.symbols는 문자열 또는 문자열 배열이어야 합니다",
        )),
    }
}

fn serialize_redacted<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if secret.expose_secret().is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str("[REDACTED]")
    }
}

impl BotConfig {
    /// 파일과 환경 변수에서 설정을 로드하고 검증합니다.
    ///
    /// 파일이 없으면 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> SignalResult<Self> {
        let builder = Self::base_builder()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(Self::env_source());

        Self::finish(builder)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> SignalResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// TOML 문자열에서 설정을 로드하고 검증합니다 (환경 변수 미적용).
    pub fn from_toml_str(content: &str) -> SignalResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml));

        Self::finish(builder)
    }

    fn base_builder() -> SignalResult<config::ConfigBuilder<config::builder::DefaultState>> {
        let mut builder = config::Config::builder();

        // 토큰 전용 환경 변수는 가장 낮은 우선순위로 취급
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            builder = builder.set_default("telegram.bot_token", token)?;
        }

        Ok(builder)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("destinations.all_recipients")
            .with_list_parse_key("destinations.group_only")
            .with_list_parse_key("signals.symbols")
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> SignalResult<Self> {
        let config: BotConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 불변 조건을 검증합니다.
    pub fn validate(&self) -> SignalResult<()> {
        if self.telegram.bot_token.expose_secret().trim().is_empty() {
            return Err(SignalError::Config(
                "telegram.bot_token이 설정되지 않았습니다 (TELEGRAM_BOT_TOKEN 또는 SIGNAL_BOT__TELEGRAM__BOT_TOKEN)"
                    .to_string(),
            ));
        }

        if self.telegram.api_base_url.trim().is_empty() {
            return Err(SignalError::Config(
                "telegram.api_base_url이 비어 있습니다".to_string(),
            ));
        }

        self.recipients()?;
        self.validate_symbols()?;
        self.alert_formatter()?;

        self.logging
            .format
            .parse::<LogFormat>()
            .map_err(SignalError::Config)?;

        Ok(())
    }

    fn validate_symbols(&self) -> SignalResult<()> {
        if self.signals.symbols.is_empty() {
            return Err(SignalError::Config("signals.symbols가 비어 있습니다".to_string()));
        }

        for symbol in &self.signals.symbols {
            if symbol.trim().is_empty() {
                return Err(SignalError::Config(
                    "signals.symbols에 빈 심볼이 있습니다".to_string(),
                ));
            }
            if symbol.contains(TOKEN_SEPARATOR) {
                return Err(SignalError::Config(format!(
                    "심볼 {:?}에 토큰 구분자 '{}'가 포함되어 있습니다",
                    symbol, TOKEN_SEPARATOR
                )));
            }
            let longest = Direction::all()
                .into_iter()
                .map(|d| SignalToken::encoded_len(symbol, d))
                .max()
                .unwrap_or_default();
            if longest > CALLBACK_DATA_LIMIT {
                return Err(SignalError::Config(format!(
                    "심볼 {:?}이(가) 너무 깁니다 (콜백 데이터 {}바이트 > {}바이트)",
                    symbol, longest, CALLBACK_DATA_LIMIT
                )));
            }
        }

        Ok(())
    }

    /// 검증된 수신자 목록.
    pub fn recipients(&self) -> SignalResult<Recipients> {
        Recipients::new(
            self.destinations.all_recipients.clone(),
            self.destinations.group_only.clone(),
        )
    }

    /// 관리자 게이트.
    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.access.admin_id)
    }

    /// 심볼 목록.
    pub fn roster(&self) -> SymbolRoster {
        SymbolRoster::new(self.signals.symbols.clone())
    }

    /// 알림 포맷터 (시간대 파싱 포함).
    pub fn alert_formatter(&self) -> SignalResult<AlertFormatter> {
        let timezone = self.signals.timezone.parse::<Tz>().map_err(|e| {
            SignalError::Config(format!(
                "signals.timezone {:?}을(를) 해석할 수 없습니다: {}",
                self.signals.timezone, e
            ))
        })?;

        Ok(AlertFormatter::new(self.signals.timeframe.clone(), timezone))
    }

    /// 토큰을 가린 TOML 표현.
    pub fn to_redacted_toml(&self) -> SignalResult<String> {
        toml::to_string_pretty(self).map_err(|e| SignalError::Config(e.to_string()))
    }
}
