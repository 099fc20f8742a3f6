//! 인가 판정 엔진.
//!
//! 검증된 principal과 작업별 요구 역할 집합을 받아 allow/deny를
//! 반환합니다. 보호된 작업이 무엇을 하는지는 알지 못하며, 판정에
//! 필요한 모든 입력은 명시적 인자로 전달됩니다 (전역/ambient 상태
//! 없음).

use crate::auth::jwt::Claims;
use crate::auth::roles::RoleSet;
use crate::error::ApiError;
use crate::repository::User;

/// 사용자 레코드에 대한 인가 판정.
///
/// `is_active`가 true이고 역할이 요구 집합에 포함될 때만 허용합니다.
/// 비활성 사용자는 역할과 무관하게 거부됩니다.
pub fn authorize(user: &User, requirement: RoleSet) -> Result<(), ApiError> {
    if user.is_active && requirement.contains(user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// 토큰 클레임에 대한 인가 판정.
///
/// 토큰 검증은 저장소를 조회하지 않으므로 여기서는 발급 시점의 역할
/// 스냅샷만 확인합니다 (활성 여부는 발급 시점에 이미 검증됨).
pub fn authorize_claims(claims: &Claims, requirement: RoleSet) -> Result<(), ApiError> {
    if requirement.contains(claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// 자기 자신에 대한 파괴적 작업 판정.
///
/// 자신의 계정 삭제 같은 작업은 Admin을 포함한 모든 역할에서
/// 무조건 거부됩니다. 역할 검사가 아니라 비즈니스 불변식입니다.
pub fn authorize_self_action(actor_id: i64, target_id: i64) -> Result<(), ApiError> {
    if actor_id == target_id {
        Err(ApiError::Forbidden)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{Role, ADMIN_ONLY, ANY_ROLE, MANAGER_AND_ABOVE, STAFF_AND_ABOVE};
    use chrono::Utc;

    const ALL_ROLES: [Role; 4] = [Role::Viewer, Role::Staff, Role::Manager, Role::Admin];

    fn user(role: Role, is_active: bool) -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Kim".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_authorize_exact_set_membership() {
        for role in ALL_ROLES {
            let active = user(role, true);
            let expected = STAFF_AND_ABOVE.contains(role);
            assert_eq!(
                authorize(&active, STAFF_AND_ABOVE).is_ok(),
                expected,
                "role {} against staff-and-above",
                role
            );
        }

        // Manager 이상 집합에서 Staff는 거부
        assert!(authorize(&user(Role::Staff, true), MANAGER_AND_ABOVE).is_err());
        assert!(authorize(&user(Role::Manager, true), MANAGER_AND_ABOVE).is_ok());
    }

    #[test]
    fn test_inactive_forces_deny_regardless_of_role() {
        for role in ALL_ROLES {
            let inactive = user(role, false);
            assert!(authorize(&inactive, ANY_ROLE).is_err());
            assert!(authorize(&inactive, ADMIN_ONLY).is_err());
        }
    }

    #[test]
    fn test_authorize_claims() {
        let viewer = Claims::new(1, "viewer", Role::Viewer, 60);
        assert!(authorize_claims(&viewer, ANY_ROLE).is_ok());
        assert!(authorize_claims(&viewer, STAFF_AND_ABOVE).is_err());

        let admin = Claims::new(2, "admin", Role::Admin, 60);
        assert!(authorize_claims(&admin, ADMIN_ONLY).is_ok());
        assert!(authorize_claims(&admin, STAFF_AND_ABOVE).is_ok());
    }

    #[test]
    fn test_self_action_always_denied_for_every_role() {
        // 최고 권한(Admin)을 포함해 자기 자신 대상은 무조건 거부
        for role in ALL_ROLES {
            let claims = Claims::new(7, "someone", role, 60);
            assert!(authorize_self_action(claims.uid, 7).is_err());
            assert!(authorize_self_action(claims.uid, 8).is_ok());
        }
    }

    #[test]
    fn test_deny_is_forbidden_kind() {
        let result = authorize(&user(Role::Viewer, true), ADMIN_ONLY);
        assert!(matches!(result, Err(ApiError::Forbidden)));

        let result = authorize_self_action(3, 3);
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }
}
