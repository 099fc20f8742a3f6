//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/` - 환영 메시지
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth` - 로그인, 사용자 등록/관리
//! - `/assets` - 자산 CRUD

pub mod assets;
pub mod auth;
pub mod health;

pub use assets::{assets_router, AssetCreateRequest, AssetResponse, AssetUpdateRequest};
pub use auth::{
    auth_router, LoginRequest, RegisterRequest, TokenResponse, UserResponse, UserUpdateRequest,
};
pub use health::{health_router, HealthResponse, StoreStats};

use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Json, Router};

use crate::middleware::RateLimiter;
use crate::state::AppState;

/// 환영 메시지.
///
/// GET /
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to Asset Inventory API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// 허용 제어기는 명시적으로 주입되며 라우트별 엔드포인트 클래스에
/// 묶여 적용됩니다.
pub fn create_api_router(limiter: Arc<RateLimiter>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .nest("/health", health_router())
        .nest("/auth", auth_router(limiter.clone()))
        .nest("/assets", assets_router(limiter))
}
