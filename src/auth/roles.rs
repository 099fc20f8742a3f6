//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할과 작업별 요구 역할 집합을 정의합니다.
//!
//! 역할 계층은 Viewer < Staff < Manager < Admin이지만, 인가 판정은
//! 숫자 비교가 아니라 각 작업이 선언한 [`RoleSet`]의 정확한
//! 집합 멤버십으로 이루어집니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의하는 닫힌 집합입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 뷰어 - 읽기 전용
    Viewer,
    /// 스태프 - 자산 등록 가능
    Staff,
    /// 매니저 - 자산 등록/수정 가능
    Manager,
    /// 관리자 - 모든 작업 및 사용자 관리
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Viewer => "viewer",
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// 작업별 요구 역할 집합.
///
/// "이 중 하나의 역할이면 충분하다"를 표현합니다. 각 보호된 작업은
/// 컴파일 타임 상수로 자신의 요구 집합을 선언합니다.
#[derive(Debug, Clone, Copy)]
pub struct RoleSet {
    roles: &'static [Role],
}

impl RoleSet {
    /// 역할 목록으로 요구 집합 생성.
    pub const fn of(roles: &'static [Role]) -> Self {
        Self { roles }
    }

    /// 역할이 집합에 포함되는지 확인.
    pub fn contains(&self, role: Role) -> bool {
        self.roles.iter().any(|r| *r == role)
    }

    /// 포함된 역할 목록.
    pub fn roles(&self) -> &'static [Role] {
        self.roles
    }
}

/// 인증만 요구하는 작업 (모든 역할 허용).
pub const ANY_ROLE: RoleSet = RoleSet::of(&[Role::Viewer, Role::Staff, Role::Manager, Role::Admin]);

/// 자산 등록: Staff 이상.
pub const STAFF_AND_ABOVE: RoleSet = RoleSet::of(&[Role::Staff, Role::Manager, Role::Admin]);

/// 자산 수정: Manager 이상.
pub const MANAGER_AND_ABOVE: RoleSet = RoleSet::of(&[Role::Manager, Role::Admin]);

/// 사용자 관리 및 자산 삭제: Admin 전용.
pub const ADMIN_ONLY: RoleSet = RoleSet::of(&[Role::Admin]);
