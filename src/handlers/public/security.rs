// handlers/public/security.rs - POST /api/security/{login,register-admin,register-user}

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::dto::{
    DtoUserAuthenticationRequest, DtoUserAuthenticationResponse, DtoUserRegistrationRequest,
    DtoUserRegistrationResponse,
};
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::types::UserRole;

/// Exchange username and password for a bearer token and a new session
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<DtoUserAuthenticationRequest>, JsonRejection>,
) -> ApiResult<DtoUserAuthenticationResponse> {
    let Json(request) = payload?;
    let response = state.security.login(request).await?;
    Ok(ApiResponse::success(response))
}

pub async fn register_admin(
    State(state): State<AppState>,
    payload: Result<Json<DtoUserRegistrationRequest>, JsonRejection>,
) -> ApiResult<DtoUserRegistrationResponse> {
    register(state, payload, UserRole::Admin).await
}

pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<DtoUserRegistrationRequest>, JsonRejection>,
) -> ApiResult<DtoUserRegistrationResponse> {
    register(state, payload, UserRole::User).await
}

async fn register(
    state: AppState,
    payload: Result<Json<DtoUserRegistrationRequest>, JsonRejection>,
    role: UserRole,
) -> ApiResult<DtoUserRegistrationResponse> {
    let Json(request) = payload?;
    let response = state.security.register(request, role).await?;
    Ok(ApiResponse::created(response))
}
