//! # Signal Core
//!
//! OTC 시그널 봇의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 전송 계층과 무관한 순수 로직만 포함합니다:
//! - 수신 대상(Destination) 및 수신자 목록
//! - 시그널 토큰 인코딩/디코딩
//! - 시그널 알림 메시지 포맷
//! - 심볼 목록 및 검색
//! - 관리자 권한 확인
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
