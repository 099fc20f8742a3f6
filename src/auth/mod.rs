//! 인증 및 권한 부여.
//!
//! JWT 기반 인증, 역할 기반 접근 제어(RBAC), 자격증명 검증을
//! 제공합니다.
//!
//! # 구성 요소
//!
//! - [`password`]: Argon2id 해싱/검증 (72바이트 절단 불변식)
//! - [`jwt`]: 서명된 시간 제한 토큰 발급/검증
//! - [`resolver`]: 자격증명 쌍 → 검증된 사용자
//! - [`policy`]: 역할 집합 기반 allow/deny 판정 및 자기 작업 제한
//! - [`middleware`]: Axum 핸들러용 [`AuthUser`] 추출기
//! - [`roles`]: 닫힌 역할 집합과 작업별 요구 집합 상수

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod resolver;
pub mod roles;

pub use jwt::{create_token, decode_token, Claims, TokenError};
pub use middleware::AuthUser;
pub use password::{hash_password, verify_password, PasswordError, MAX_PASSWORD_BYTES};
pub use policy::{authorize, authorize_claims, authorize_self_action};
pub use resolver::authenticate;
pub use roles::{Role, RoleSet, ADMIN_ONLY, ANY_ROLE, MANAGER_AND_ABOVE, STAFF_AND_ABOVE};
