//! 통합 API 에러 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! # 에러 분류
//!
//! - `Unauthenticated` (401): 토큰 부재/형식 오류/만료/서명 불일치.
//!   하위 원인과 무관하게 항상 동일한 응답 본문으로 표면화됩니다.
//! - `InvalidCredentials` (401): 로그인 실패. 존재하지 않는 사용자,
//!   틀린 비밀번호, 비활성 계정이 모두 하나로 합쳐집니다.
//! - `Forbidden` (403): 유효한 토큰이지만 역할 미달 또는 자기 자신에
//!   대한 파괴적 작업 위반.
//! - `Throttled` (429): 요청 한도 초과. `Retry-After` 헤더 포함.
//! - `DuplicateIdentity` (400): 이미 사용 중인 사용자 이름.
//! - `Service` (503): 저장소 등 협력자 내부 오류. 보안 판정으로
//!   위장되지 않도록 불투명하게 표면화되며 상세는 로그로만 남습니다.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHENTICATED", "FORBIDDEN", "THROTTLED")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Unauthenticated의 내부 원인.
///
/// 응답 본문에는 반영되지 않고 로그에만 남습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedCause {
    /// Authorization 헤더 없음
    MissingToken,
    /// Bearer 형식이 아닌 헤더
    InvalidAuthHeader,
    /// 만료된 토큰
    TokenExpired,
    /// 서명 불일치 또는 구조적으로 잘못된 토큰
    InvalidToken,
    /// 토큰은 유효하나 대상 사용자가 더 이상 존재하지 않음
    UnknownSubject,
}

impl UnauthenticatedCause {
    fn as_str(self) -> &'static str {
        match self {
            UnauthenticatedCause::MissingToken => "missing_token",
            UnauthenticatedCause::InvalidAuthHeader => "invalid_auth_header",
            UnauthenticatedCause::TokenExpired => "token_expired",
            UnauthenticatedCause::InvalidToken => "invalid_token",
            UnauthenticatedCause::UnknownSubject => "unknown_subject",
        }
    }
}

/// API 에러.
///
/// 핸들러와 미들웨어가 반환하는 최종 per-request 실패 결과입니다.
/// 이 코어는 어떤 실패도 자동으로 재시도하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("인증 정보가 유효하지 않습니다")]
    Unauthenticated(UnauthenticatedCause),

    #[error("이 작업을 수행할 권한이 없습니다")]
    Forbidden,

    #[error("사용자 이름 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    #[error("요청 한도를 초과했습니다")]
    Throttled { retry_after_secs: u64 },

    #[error("이미 등록된 사용자 이름입니다: {username}")]
    DuplicateIdentity { username: String },

    #[error("{resource}을(를) 찾을 수 없습니다: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("일시적인 서비스 오류가 발생했습니다")]
    Service(#[source] anyhow::Error),
}

impl ApiError {
    /// HTTP 상태 코드와 에러 코드 문자열 매핑.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            ApiError::Throttled { .. } => (StatusCode::TOO_MANY_REQUESTS, "THROTTLED"),
            ApiError::DuplicateIdentity { .. } => (StatusCode::BAD_REQUEST, "DUPLICATE_IDENTITY"),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Service(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            // 하위 원인은 로그로만 남기고 응답은 동일하게 유지
            ApiError::Unauthenticated(cause) => {
                tracing::debug!(cause = cause.as_str(), "Request unauthenticated");
            }
            // 협력자 오류 상세는 절대 응답으로 내보내지 않음
            ApiError::Service(source) => {
                tracing::error!(error = %source, "Service error while handling request");
            }
            _ => {}
        }

        let body = match &self {
            ApiError::DuplicateIdentity { username } => ApiErrorResponse::with_details(
                code,
                self.to_string(),
                serde_json::json!({ "username": username }),
            ),
            ApiError::NotFound { resource, id } => ApiErrorResponse::with_details(
                code,
                self.to_string(),
                serde_json::json!({ "resource": resource, "id": id }),
            ),
            _ => ApiErrorResponse::new(code, self.to_string()),
        };
        let mut response = (status, Json(body)).into_response();

        if let ApiError::Throttled { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
