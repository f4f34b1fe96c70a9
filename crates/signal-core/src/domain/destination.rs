//! 메시지 수신 대상.
//!
//! 텔레그램 채팅 ID는 부호 있는 정수입니다. 개인 채팅은 양수,
//! 그룹/채널은 음수(`-100...`)를 사용합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SignalError, SignalResult};

/// 단일 채팅/그룹 엔드포인트 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(pub i64);

impl From<i64> for Destination {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 브로드캐스트 대상 그룹.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// 전체 수신자 (개인 + 그룹)
    AllRecipients,
    /// 그룹 전용
    GroupOnly,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::AllRecipients => write!(f, "all_recipients"),
            Audience::GroupOnly => write!(f, "group_only"),
        }
    }
}

/// 고정 수신자 목록.
///
/// 생성 시점에 검증되며 이후 변경되지 않습니다.
/// 두 목록은 의도적으로 겹칠 수 있고 중복 제거를 하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients {
    all: Vec<Destination>,
    group_only: Vec<Destination>,
}

impl Recipients {
    /// 수신자 목록을 검증하여 생성합니다.
    ///
    /// - 전체 수신자 목록은 비어 있을 수 없습니다.
    /// - 그룹 전용 목록의 모든 항목은 전체 수신자 목록에도 있어야 합니다.
    pub fn new(all: Vec<Destination>, group_only: Vec<Destination>) -> SignalResult<Self> {
        if all.is_empty() {
            return Err(SignalError::Config(
                "destinations.all_recipients 목록이 비어 있습니다".to_string(),
            ));
        }

        if let Some(stray) = group_only.iter().find(|d| !all.contains(d)) {
            return Err(SignalError::Config(format!(
                "group_only 대상 {}이(가) all_recipients에 없습니다",
                stray
            )));
        }

        Ok(Self { all, group_only })
    }

    /// 대상 그룹에 해당하는 수신자 목록을 설정 순서대로 반환합니다.
    pub fn for_audience(&self, audience: Audience) -> &[Destination] {
        match audience {
            Audience::AllRecipients => &self.all,
            Audience::GroupOnly => &self.group_only,
        }
    }

    /// 전체 수신자 목록.
    pub fn all(&self) -> &[Destination] {
        &self.all
    }

    /// 그룹 전용 목록.
    pub fn group_only(&self) -> &[Destination] {
        &self.group_only
    }
}
