//! Axum용 JWT 인증 추출기.
//!
//! Authorization 헤더의 bearer 토큰을 검증하고 클레임을 핸들러의
//! 명시적 인자로 전달합니다. 토큰 검증은 상태를 갖지 않으며 저장소를
//! 조회하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::jwt::{decode_token, Claims, TokenError};
use crate::error::{ApiError, UnauthenticatedCause};
use crate::state::AppState;

/// JWT 인증 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthUser(claims): AuthUser,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated(
                UnauthenticatedCause::MissingToken,
            ))?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated(
                UnauthenticatedCause::InvalidAuthHeader,
            ))?;

        // 토큰 검증 (하위 원인은 로그 용도로만 구분)
        let token_data =
            decode_token(token, &state.auth.jwt_secret).map_err(|e| match e {
                TokenError::TokenExpired => {
                    ApiError::Unauthenticated(UnauthenticatedCause::TokenExpired)
                }
                _ => ApiError::Unauthenticated(UnauthenticatedCause::InvalidToken),
            })?;

        Ok(AuthUser(token_data.claims))
    }
}
