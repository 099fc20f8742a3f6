//! 인증 및 사용자 관리 엔드포인트.
//!
//! - `POST /auth/login` - 로그인 및 토큰 발급 (5회/분)
//! - `POST /auth/register` - 사용자 등록 (Admin 전용, 30회/시간)
//! - `GET /auth/me` - 현재 사용자 정보
//! - `GET /auth/users` - 사용자 목록 (Admin 전용)
//! - `PUT /auth/users/{id}` - 사용자 수정 (Admin 전용, 30회/분)
//! - `DELETE /auth/users/{id}` - 사용자 삭제 (Admin 전용, 10회/분)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{
    authenticate, authorize_claims, authorize_self_action, create_token, hash_password, AuthUser,
    Claims, Role, ADMIN_ONLY,
};
use crate::error::{ApiError, ApiResult, UnauthenticatedCause};
use crate::middleware::{admission_middleware, AdmissionState, EndpointClass, RateLimiter};
use crate::repository::{NewUser, User, UserUpdate};
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 토큰 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access Token (bearer)
    pub access_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// 만료 시간 (초)
    pub expires_in: i64,
}

/// 사용자 등록 요청.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// 사용자 수정 요청 (모든 필드 선택적).
#[derive(Debug, Deserialize, Default)]
pub struct UserUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// 사용자 응답.
///
/// `password_hash`는 절대 포함되지 않습니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 로그인 및 토큰 발급.
///
/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = authenticate(state.users.as_ref(), &req.username, &req.password).await?;

    let expires_in_minutes = state.auth.access_token_expire_minutes;
    let claims = Claims::new(user.id, &user.username, user.role, expires_in_minutes);
    let access_token =
        create_token(&claims, &state.auth.jwt_secret).map_err(|e| ApiError::Service(e.into()))?;

    info!(username = %user.username, role = %user.role, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: expires_in_minutes * 60,
    }))
}

/// 새 사용자 등록 (Admin 전용).
///
/// POST /auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    authorize_claims(&claims, ADMIN_ONLY)?;

    let password_hash = hash_password(&req.password).map_err(|e| ApiError::Service(e.into()))?;
    let user = state
        .users
        .insert(NewUser {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            role: req.role,
            is_active: req.is_active,
        })
        .await?;

    info!(username = %user.username, role = %user.role, by = %claims.sub, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 현재 사용자 정보 조회.
///
/// GET /auth/me
async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(claims.uid)
        .await?
        .ok_or(ApiError::Unauthenticated(
            UnauthenticatedCause::UnknownSubject,
        ))?;

    Ok(Json(user.into()))
}

/// 전체 사용자 목록 (Admin 전용).
///
/// GET /auth/users
async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    authorize_claims(&claims, ADMIN_ONLY)?;

    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// 사용자 수정 (Admin 전용).
///
/// PUT /auth/users/{id}
async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UserUpdateRequest>,
) -> ApiResult<Json<UserResponse>> {
    authorize_claims(&claims, ADMIN_ONLY)?;

    let updated = state
        .users
        .update(
            user_id,
            UserUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                role: req.role,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or(ApiError::NotFound {
            resource: "사용자",
            id: user_id,
        })?;

    Ok(Json(updated.into()))
}

/// 사용자 삭제 (Admin 전용).
///
/// DELETE /auth/users/{id}
///
/// 자기 자신의 계정은 역할과 무관하게 삭제할 수 없습니다.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    authorize_claims(&claims, ADMIN_ONLY)?;
    authorize_self_action(claims.uid, user_id)?;

    let deleted = state.users.delete(user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound {
            resource: "사용자",
            id: user_id,
        });
    }

    info!(user_id, by = %claims.sub, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 인증 라우터 생성.
pub fn auth_router(limiter: Arc<RateLimiter>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/login",
            post(login).layer(from_fn_with_state(
                AdmissionState::new(limiter.clone(), EndpointClass::Login),
                admission_middleware,
            )),
        )
        .route(
            "/register",
            post(register).layer(from_fn_with_state(
                AdmissionState::new(limiter.clone(), EndpointClass::Register),
                admission_middleware,
            )),
        )
        .route("/me", get(me))
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            put(update_user)
                .layer(from_fn_with_state(
                    AdmissionState::new(limiter.clone(), EndpointClass::UserUpdate),
                    admission_middleware,
                ))
                .merge(axum::routing::delete(delete_user).layer(from_fn_with_state(
                    AdmissionState::new(limiter, EndpointClass::UserDelete),
                    admission_middleware,
                ))),
        )
}
