//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 저장소는 trait object로 주입되므로 인메모리 구현을 실제
//! 데이터베이스 구현으로 교체해도 핸들러는 변하지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::{hash_password, Role};
use crate::repository::{
    AssetRepository, InMemoryAssetRepository, InMemoryUserRepository, NewUser, UserRepository,
};

/// 인증 설정.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// Access Token 기본 만료 시간 (분)
    pub access_token_expire_minutes: i64,
}

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 저장소 (Principal 조회 협력자)
    pub users: Arc<dyn UserRepository>,
    /// 자산 저장소
    pub assets: Arc<dyn AssetRepository>,
    /// 인증 설정
    pub auth: AuthSettings,
    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    /// 인메모리 저장소로 새 AppState 생성.
    pub fn new(auth: AuthSettings) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            assets: Arc::new(InMemoryAssetRepository::new()),
            auth,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 초기 관리자 계정 시드.
    ///
    /// 저장소가 비어 있을 때만 Admin 계정을 생성합니다. 인메모리
    /// 저장소는 재시작마다 초기화되므로 이 계정이 없으면 아무도
    /// 로그인할 수 없습니다.
    pub async fn seed_admin(&self, username: &str, password: &str) -> anyhow::Result<()> {
        if self.users.count().await? > 0 {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                first_name: "System".to_string(),
                last_name: "Admin".to_string(),
                password_hash,
                role: Role::Admin,
                is_active: true,
            })
            .await?;

        info!(username = %admin.username, id = admin.id, "Seeded initial admin user");
        Ok(())
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 개발 환경용 기본 JWT 시크릿.
///
/// `JWT_SECRET` 미설정 시 경고와 함께 사용됩니다.
pub fn default_jwt_secret() -> String {
    warn!("JWT_SECRET not set, using default (INSECURE for development only)");
    "dev-secret-key-change-in-production".to_string()
}
