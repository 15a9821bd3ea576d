// handlers/protected/categories.rs - /api/categories/*

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::DtoCategory;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<DtoCategory>> {
    Ok(ApiResponse::success(state.categories.get_all().await?))
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<DtoCategory> {
    Ok(ApiResponse::success(state.categories.get_by_id(id).await?))
}

/// Number of distinct zones holding devices of this category.
/// Several devices in one zone count that zone once.
pub async fn get_num_of_zones(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<i64> {
    Ok(ApiResponse::success(
        state.device_queries.zone_count_for_category(id).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<DtoCategory>, JsonRejection>,
) -> ApiResult<DtoCategory> {
    let Json(dto) = payload?;
    Ok(ApiResponse::created(state.categories.create(dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DtoCategory>, JsonRejection>,
) -> ApiResult<DtoCategory> {
    let Json(dto) = payload?;
    Ok(ApiResponse::accepted(state.categories.update(id, dto).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<()> {
    state.categories.delete(id).await?;
    Ok(ApiResponse::no_content())
}
