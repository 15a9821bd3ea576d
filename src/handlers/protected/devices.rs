// handlers/protected/devices.rs - /api/devices/*

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::DtoDevice;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<DtoDevice>> {
    Ok(ApiResponse::success(state.devices.get_all().await?))
}

pub async fn get_all_by_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
) -> ApiResult<Vec<DtoDevice>> {
    Ok(ApiResponse::success(state.device_queries.devices_by_zone(zone_id).await?))
}

pub async fn get_all_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Vec<DtoDevice>> {
    Ok(ApiResponse::success(
        state.device_queries.devices_by_category(category_id).await?,
    ))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<DtoDevice> {
    Ok(ApiResponse::success(state.devices.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<DtoDevice>, JsonRejection>,
) -> ApiResult<DtoDevice> {
    let Json(dto) = payload?;
    Ok(ApiResponse::created(state.devices.create(dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DtoDevice>, JsonRejection>,
) -> ApiResult<DtoDevice> {
    let Json(dto) = payload?;
    Ok(ApiResponse::accepted(state.devices.update(id, dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    state.devices.delete(id).await?;
    Ok(ApiResponse::no_content())
}
