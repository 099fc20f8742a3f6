//! Principal Resolver.
//!
//! 원시 자격증명 쌍을 검증된 사용자로 변환합니다.
//!
//! 실패 사유(존재하지 않는 사용자 / 틀린 비밀번호 / 비활성 계정)는
//! 계정 열거 공격을 막기 위해 호출자에게 단일한 `InvalidCredentials`로
//! 합쳐집니다. 디버깅 편의를 위해 메시지를 세분화하지 않는 것이
//! 의도된 동작입니다.

use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::repository::{User, UserRepository};

/// 자격증명 검증.
///
/// 순서대로 확인하며 첫 실패에서 중단합니다:
/// 1. 사용자 이름 조회 (외부 협력자)
/// 2. 비밀번호 해시 검증 (CPU 바운드, 수십 ms 블로킹 가능)
/// 3. 활성 플래그 확인
///
/// 저장소 장애는 자격증명 판정이 아니라 서비스 오류로 전파됩니다.
pub async fn authenticate(
    users: &dyn UserRepository,
    username: &str,
    password: &str,
) -> Result<User, ApiError> {
    let user = users
        .find_by_username(username)
        .await
        .map_err(|e| ApiError::Service(e.into()))?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}
