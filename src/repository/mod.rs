//! 저장소 협력자 인터페이스.
//!
//! 인증 코어는 영속성을 소유하지 않습니다. 사용자/자산 저장소는
//! trait으로 추상화된 외부 협력자이며, 이 크레이트는 단일 인스턴스
//! 배포용 인메모리 구현만 제공합니다. 실제 데이터베이스 구현으로
//! 교체해도 호출부는 변하지 않습니다.

pub mod assets;
pub mod users;

pub use assets::{Asset, AssetRepository, AssetStatus, AssetUpdate, InMemoryAssetRepository, NewAsset};
pub use users::{InMemoryUserRepository, NewUser, User, UserRepository, UserUpdate};

use crate::error::ApiError;

/// 저장소 작업 에러.
///
/// 협력자 계약: 저장소 내부 장애는 보안 판정(`InvalidCredentials` 등)이
/// 아니라 일반 서비스 오류로 전파되어야 합니다.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("이미 등록된 사용자 이름입니다: {0}")]
    DuplicateUsername(String),

    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateUsername(username) => {
                ApiError::DuplicateIdentity { username }
            }
            e @ RepositoryError::Unavailable(_) => ApiError::Service(e.into()),
        }
    }
}
