//! 자산 CRUD 엔드포인트.
//!
//! - `GET /assets` - 목록 조회 (공개, 100회/분)
//! - `GET /assets/{id}` - 단건 조회 (인증 필요, 100회/분)
//! - `POST /assets` - 등록 (Staff 이상, 20회/분)
//! - `PUT /assets/{id}` - 수정 (Manager 이상, 30회/분)
//! - `DELETE /assets/{id}` - 삭제 (Admin 전용, 10회/분)
//!
//! 자산 자체는 인증 코어의 관심사가 아닙니다. 각 핸들러는 요구 역할
//! 집합을 선언하고 판정을 policy 모듈에 위임할 뿐입니다.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{authorize_claims, AuthUser, ADMIN_ONLY, ANY_ROLE, MANAGER_AND_ABOVE, STAFF_AND_ABOVE};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{admission_middleware, AdmissionState, EndpointClass, RateLimiter};
use crate::repository::{Asset, AssetStatus, AssetUpdate, NewAsset};
use crate::state::AppState;

/// 자산 등록 요청.
#[derive(Debug, Deserialize)]
pub struct AssetCreateRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: AssetStatus,
    pub location: Option<String>,
    pub asset_type: Option<String>,
}

/// 자산 수정 요청 (모든 필드 선택적).
#[derive(Debug, Deserialize, Default)]
pub struct AssetUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub asset_type: Option<String>,
}

/// 자산 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssetResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub asset_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            description: asset.description,
            status: asset.status,
            location: asset.location,
            asset_type: asset.asset_type,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

/// 목록 조회 파라미터.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// 자산 목록 조회 (공개).
///
/// GET /assets
async fn list_assets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<AssetResponse>>> {
    let assets = state.assets.list(params.skip, params.limit).await?;
    Ok(Json(assets.into_iter().map(AssetResponse::from).collect()))
}

/// 자산 단건 조회 (인증 필요).
///
/// GET /assets/{id}
async fn get_asset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(asset_id): Path<i64>,
) -> ApiResult<Json<AssetResponse>> {
    authorize_claims(&claims, ANY_ROLE)?;

    let asset = state
        .assets
        .find_by_id(asset_id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "자산",
            id: asset_id,
        })?;

    Ok(Json(asset.into()))
}

/// 자산 등록 (Staff 이상).
///
/// POST /assets
async fn create_asset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<AssetCreateRequest>,
) -> ApiResult<(StatusCode, Json<AssetResponse>)> {
    authorize_claims(&claims, STAFF_AND_ABOVE)?;

    let asset = state
        .assets
        .insert(NewAsset {
            name: req.name,
            description: req.description,
            status: req.status,
            location: req.location,
            asset_type: req.asset_type,
        })
        .await?;

    info!(asset_id = asset.id, by = %claims.sub, "Asset created");
    Ok((StatusCode::CREATED, Json(asset.into())))
}

/// 자산 수정 (Manager 이상).
///
/// PUT /assets/{id}
async fn update_asset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(asset_id): Path<i64>,
    Json(req): Json<AssetUpdateRequest>,
) -> ApiResult<Json<AssetResponse>> {
    authorize_claims(&claims, MANAGER_AND_ABOVE)?;

    let updated = state
        .assets
        .update(
            asset_id,
            AssetUpdate {
                name: req.name,
                description: req.description,
                status: req.status,
                location: req.location,
                asset_type: req.asset_type,
            },
        )
        .await?
        .ok_or(ApiError::NotFound {
            resource: "자산",
            id: asset_id,
        })?;

    Ok(Json(updated.into()))
}

/// 자산 삭제 (Admin 전용).
///
/// DELETE /assets/{id}
async fn delete_asset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(asset_id): Path<i64>,
) -> ApiResult<StatusCode> {
    authorize_claims(&claims, ADMIN_ONLY)?;

    let deleted = state.assets.delete(asset_id).await?;
    if !deleted {
        return Err(ApiError::NotFound {
            resource: "자산",
            id: asset_id,
        });
    }

    info!(asset_id, by = %claims.sub, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 자산 라우터 생성.
pub fn assets_router(limiter: Arc<RateLimiter>) -> Router<Arc<AppState>> {
    let read_admission = AdmissionState::new(limiter.clone(), EndpointClass::AssetRead);

    Router::new()
        .route(
            "/",
            get(list_assets)
                .layer(from_fn_with_state(
                    read_admission.clone(),
                    admission_middleware,
                ))
                .merge(post(create_asset).layer(from_fn_with_state(
                    AdmissionState::new(limiter.clone(), EndpointClass::AssetCreate),
                    admission_middleware,
                ))),
        )
        .route(
            "/{id}",
            get(get_asset)
                .layer(from_fn_with_state(read_admission, admission_middleware))
                .merge(
                    put(update_asset).layer(from_fn_with_state(
                        AdmissionState::new(limiter.clone(), EndpointClass::AssetUpdate),
                        admission_middleware,
                    )),
                )
                .merge(delete(delete_asset).layer(from_fn_with_state(
                    AdmissionState::new(limiter, EndpointClass::AssetDelete),
                    admission_middleware,
                ))),
        )
}
