// handlers/protected/zones.rs - /api/zones/*

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::DtoZone;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<DtoZone>> {
    Ok(ApiResponse::success(state.zones.get_all().await?))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<DtoZone> {
    Ok(ApiResponse::success(state.zones.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<DtoZone>, JsonRejection>,
) -> ApiResult<DtoZone> {
    let Json(dto) = payload?;
    Ok(ApiResponse::created(state.zones.create(dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DtoZone>, JsonRejection>,
) -> ApiResult<DtoZone> {
    let Json(dto) = payload?;
    Ok(ApiResponse::accepted(state.zones.update(id, dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    state.zones.delete(id).await?;
    Ok(ApiResponse::no_content())
}
