//! 시그널 봇 CLI.
//!
//! - `run` - 봇 실행 (long polling)
//! - `check-config` - 설정 검증 및 출력
//! - `symbols` - 심볼 목록/검색 결과 확인

pub mod commands;

pub use commands::*;
