// handlers/protected/security.rs - DELETE /api/security/logout, GET /api/security/get-user-by-id/:id

use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::dto::{DtoMessage, DtoSystemUser};
use crate::middleware::{ApiResponse, ApiResult, SessionContext};
use crate::server::AppState;

/// Close the caller's session; the token stops working immediately
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<DtoMessage> {
    state.security.logout(session.session_id).await?;
    Ok(ApiResponse::success(DtoMessage {
        message: "You have been logged out successfully".to_string(),
    }))
}

pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DtoSystemUser> {
    let user = state.security.get_user_by_id(id).await?;
    Ok(ApiResponse::success(user))
}
