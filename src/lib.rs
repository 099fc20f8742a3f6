//! 자산 인벤토리 REST API.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 역할 기반 접근 제어 (Viewer/Staff/Manager/Admin)
//! - 엔드포인트 클래스별 요청 허용 제어 (rate limiting)
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`auth`]: 자격증명 해싱, 토큰 발급/검증, 인가 판정
//! - [`middleware`]: 요청 허용 제어 HTTP middleware
//! - [`repository`]: 사용자/자산 저장소 협력자 인터페이스
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`error`]: 통합 에러 분류 및 응답 형식
//! - [`config`]: 환경 변수 기반 서버 설정

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    authenticate, authorize, authorize_claims, authorize_self_action, create_token, decode_token,
    hash_password, verify_password, AuthUser, Claims, Role, RoleSet,
};
pub use config::ServerConfig;
pub use error::{ApiError, ApiErrorResponse, ApiResult, UnauthenticatedCause};
pub use middleware::{AdmissionResult, EndpointClass, Quota, RateLimiter};
pub use repository::{Asset, AssetRepository, User, UserRepository};
pub use routes::create_api_router;
pub use state::{AppState, AuthSettings};
