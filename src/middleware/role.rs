use axum::{extract::Request, middleware::Next, response::Response};

use super::session::SessionContext;
use crate::error::ApiError;
use crate::types::UserRole;

async fn require_role(request: Request, next: Next, allowed: &[UserRole]) -> Result<Response, ApiError> {
    let Some(context) = request.extensions().get::<SessionContext>() else {
        return Err(ApiError::unauthorized("Authentication is required to access this resource"));
    };

    match context.role() {
        Some(role) if allowed.contains(&role) => Ok(next.run(request).await),
        _ => {
            tracing::warn!(
                user = context.user_name.as_deref().unwrap_or("-"),
                role = context.role.as_deref().unwrap_or("-"),
                "Role not permitted for route"
            );
            Err(ApiError::forbidden("You are not permitted to access this resource"))
        }
    }
}

/// Route guard: `Admin` only
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(request, next, &[UserRole::Admin]).await
}

/// Route guard: any signed-in role
pub async fn require_authenticated_role(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(request, next, &[UserRole::Admin, UserRole::User]).await
}
