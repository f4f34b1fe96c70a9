//! CLI 명령어 구현.

pub mod check_config;
pub mod run;
pub mod symbols;

pub use check_config::*;
pub use run::*;
pub use symbols::*;
