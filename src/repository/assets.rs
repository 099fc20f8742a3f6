//! 자산 저장소.
//!
//! 자산 CRUD는 인증 코어 외부의 비즈니스 영역입니다. 코어가 보호하는
//! 대상 작업을 HTTP로 끝까지 구동하기 위한 인메모리 구현만 둡니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::RepositoryError;

/// 자산 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "In Use")]
    InUse,
    #[serde(rename = "Needs Repair")]
    NeedsRepair,
    #[serde(rename = "Unknown")]
    #[default]
    Unknown,
}

/// 자산 레코드.
#[derive(Debug, Clone)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub asset_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 자산 생성 입력.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub description: Option<String>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub asset_type: Option<String>,
}

/// 자산 부분 수정 입력.
#[derive(Debug, Clone, Default)]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub asset_type: Option<String>,
}

/// 자산 저장소 협력자.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Asset>, RepositoryError>;
    async fn insert(&self, new_asset: NewAsset) -> Result<Asset, RepositoryError>;
    async fn update(&self, id: i64, changes: AssetUpdate)
        -> Result<Option<Asset>, RepositoryError>;
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// 페이지네이션 목록 (id 오름차순).
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Asset>, RepositoryError>;
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// 인메모리 자산 저장소.
#[derive(Debug, Default)]
pub struct InMemoryAssetRepository {
    assets: RwLock<HashMap<i64, Asset>>,
    next_id: AtomicI64,
}

impl InMemoryAssetRepository {
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl AssetRepository for InMemoryAssetRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Asset>, RepositoryError> {
        let assets = self.assets.read().await;
        Ok(assets.get(&id).cloned())
    }

    async fn insert(&self, new_asset: NewAsset) -> Result<Asset, RepositoryError> {
        let mut assets = self.assets.write().await;

        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let asset = Asset {
            id,
            name: new_asset.name,
            description: new_asset.description,
            status: new_asset.status,
            location: new_asset.location,
            asset_type: new_asset.asset_type,
            created_at: now,
            updated_at: now,
        };

        assets.insert(id, asset.clone());
        Ok(asset)
    }

    async fn update(
        &self,
        id: i64,
        changes: AssetUpdate,
    ) -> Result<Option<Asset>, RepositoryError> {
        let mut assets = self.assets.write().await;

        let Some(asset) = assets.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            asset.name = name;
        }
        if let Some(description) = changes.description {
            asset.description = Some(description);
        }
        if let Some(status) = changes.status {
            asset.status = status;
        }
        if let Some(location) = changes.location {
            asset.location = Some(location);
        }
        if let Some(asset_type) = changes.asset_type {
            asset.asset_type = Some(asset_type);
        }
        asset.updated_at = Utc::now();

        Ok(Some(asset.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut assets = self.assets.write().await;
        Ok(assets.remove(&id).is_some())
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Asset>, RepositoryError> {
        let assets = self.assets.read().await;
        let mut all: Vec<Asset> = assets.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let assets = self.assets.read().await;
        Ok(assets.len())
    }
}
