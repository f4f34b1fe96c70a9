//! 시그널 봇의 도메인 모델.
//!
//! - `destination` - 메시지 수신 대상 및 수신자 목록
//! - `signal` - 방향과 시그널 토큰 (버튼 콜백 데이터)
//! - `alert` - 시그널 알림 메시지 포맷
//! - `roster` - 심볼 목록 및 검색
//! - `access` - 관리자 권한 확인

pub mod access;
pub mod alert;
pub mod destination;
pub mod roster;
pub mod signal;

pub use access::*;
pub use alert::*;
pub use destination::*;
pub use roster::*;
pub use signal::*;
