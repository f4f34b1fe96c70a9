//! 관리자 권한 확인.
//!
//! 설정된 단일 관리자 ID와 호출자 ID를 비교합니다. 세션, 감사 로그,
//! 잠금 기능은 없습니다.

use crate::error::{SignalError, SignalResult};

/// 권한 확인 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied,
}

impl Authorization {
    /// 허용 여부.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed)
    }
}

/// 권한 명령 게이트.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGate {
    admin_id: i64,
}

impl AdminGate {
    /// 관리자 ID로 게이트를 생성합니다.
    pub fn new(admin_id: i64) -> Self {
        Self { admin_id }
    }

    /// 설정된 관리자 ID.
    pub fn admin_id(&self) -> i64 {
        self.admin_id
    }

    /// 호출자 권한을 확인합니다.
    pub fn authorize(&self, caller_id: i64) -> Authorization {
        if caller_id == self.admin_id {
            Authorization::Allowed
        } else {
            Authorization::Denied
        }
    }

    /// 권한 명령 핸들러 최상단에서 호출하는 가드.
    ///
    /// 거부 시 `SignalError::Unauthorized`를 반환하므로 `?`로 조기 종료합니다.
    pub fn ensure_admin(&self, caller_id: i64) -> SignalResult<()> {
        if self.authorize(caller_id).is_allowed() {
            Ok(())
        } else {
            Err(SignalError::Unauthorized(caller_id))
        }
    }
}
