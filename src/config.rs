//! 서버 설정.
//!
//! 환경 변수에서 설정을 로드합니다. `.env` 파일은 선택적이며
//! 환경 변수가 우선합니다 (main에서 dotenvy로 로드).

use std::net::SocketAddr;

use crate::state::{default_jwt_secret, AuthSettings};

/// 서버 설정 구조체.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// Access Token 만료 시간 (분)
    pub access_token_expire_minutes: i64,
    /// rate limiting 비활성화 여부 (개발/테스트용)
    pub rate_limit_disabled: bool,
    /// 초기 관리자 계정 이름
    pub admin_username: String,
    /// 초기 관리자 비밀번호
    pub admin_password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: default_jwt_secret(),
            access_token_expire_minutes: 30,
            rate_limit_disabled: false,
            admin_username: "admin".to_string(),
            admin_password: "admin1234".to_string(),
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    ///
    /// - `API_HOST` (기본값: 127.0.0.1)
    /// - `API_PORT` (기본값: 3000)
    /// - `JWT_SECRET` (미설정 시 개발용 기본값, 경고 출력)
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES` (기본값: 30)
    /// - `RATE_LIMIT_DISABLED` ("true" | "1")
    /// - `ADMIN_USERNAME`, `ADMIN_PASSWORD` (초기 관리자 시드)
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| default_jwt_secret());
        let access_token_expire_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(30);
        let rate_limit_disabled = std::env::var("RATE_LIMIT_DISABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("ADMIN_PASSWORD not set, using default (INSECURE for development only)");
            "admin1234".to_string()
        });

        Self {
            host,
            port,
            jwt_secret,
            access_token_expire_minutes,
            rate_limit_disabled,
            admin_username,
            admin_password,
        }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// 인증 설정 추출.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            access_token_expire_minutes: self.access_token_expire_minutes,
        }
    }
}
