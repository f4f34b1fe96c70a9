//! # Signal Notification
//!
//! OTC 시그널 봇의 텔레그램 연동.
//!
//! - `telegram` - Bot API 클라이언트 (long polling, 메시지 전송, 콜백 응답)
//! - `broadcast` - 여러 수신자에게 독립적으로 전송하는 fan-out 엔진
//! - `bot_handler` - 명령어/버튼 이벤트 처리
//! - `polling` - 업데이트 수신 루프
//!
//! # 텔레그램 봇 명령어
//!
//! - `/start` - 전체 통화쌍 시그널 버튼
//! - `/search <키워드>` - 통화쌍 검색
//! - `/getid` - 현재 채팅 ID 확인
//! - `/admin` - 관리자 명령어 안내 (관리자 전용)
//! - `/broadcast <메시지>` - 전체 수신자 전송 (관리자 전용)
//! - `/groupbroadcast <메시지>` - 그룹 전송 (관리자 전용)

pub mod bot_handler;
pub mod broadcast;
pub mod keyboard;
pub mod polling;
pub mod telegram;
pub mod types;

pub use bot_handler::*;
pub use broadcast::*;
pub use keyboard::*;
pub use polling::*;
pub use telegram::*;
pub use types::*;
