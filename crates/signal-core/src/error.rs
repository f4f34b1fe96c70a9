//! 시그널 봇의 에러 타입.
//!
//! 이 모듈은 봇 전반에서 사용되는 도메인 에러를 정의합니다.
//! 전송 실패는 `signal-notification` 크레이트의 `NotificationError`가 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    /// 설정 에러 (시작 시점에만 발생)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 관리자가 아닌 사용자의 권한 명령 호출
    #[error("권한 없음: user_id={0}")]
    Unauthorized(i64),

    /// 필수 인자 누락 등 입력 검증 실패 (값은 사용법 안내 문구)
    #[error("입력 검증 실패: {0}")]
    Validation(String),

    /// 디코딩할 수 없는 시그널 토큰
    #[error("잘못된 시그널 토큰 {token:?}: {reason}")]
    MalformedToken { token: String, reason: String },
}

/// 도메인 작업을 위한 Result 타입.
pub type SignalResult<T> = Result<T, SignalError>;

impl SignalError {
    /// 토큰 디코딩 에러를 생성합니다.
    pub fn malformed(token: &str, reason: impl Into<String>) -> Self {
        SignalError::MalformedToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for SignalError {
    fn from(err: config::ConfigError) -> Self {
        SignalError::Config(err.to_string())
    }
}
