use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::server::AppState;
use crate::types::UserRole;

pub const SESSION_EXPIRED: &str = "Your session expired. Please re-authenticate and try again";

/// Who is calling, as asserted by a verified token whose session is
/// still open. Read-only for the rest of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub user_name: Option<String>,
    pub given_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    /// Nil when the claim was missing or not a GUID
    pub session_id: Uuid,
}

impl SessionContext {
    pub fn from_claims(claims: &Claims) -> Self {
        let session_id = claims
            .session_id
            .as_deref()
            .map(str::trim)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .unwrap_or_else(Uuid::nil);

        Self {
            user_name: claims.user_name.clone(),
            given_name: claims.given_name.clone(),
            email: claims.email.clone(),
            phone: claims.phone.clone(),
            role: claims.role.clone(),
            session_id,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(UserRole::parse)
    }
}

/// Re-checks the session row behind every authenticated request so that a
/// logged-out token stops working before it expires. Anonymous requests
/// pass straight through.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(claims) = request.extensions().get::<Claims>() else {
        return next.run(request).await;
    };
    let context = SessionContext::from_claims(claims);

    if context.session_id.is_nil() {
        tracing::debug!("Token carries no usable session id");
        return (StatusCode::UNAUTHORIZED, SESSION_EXPIRED).into_response();
    }

    match state.security.is_session_valid(context.session_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(session_id = %context.session_id, "Rejected request for closed session");
            return (StatusCode::UNAUTHORIZED, SESSION_EXPIRED).into_response();
        }
        Err(e) => return ApiError::from(e).into_response(),
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(session_id: Option<&str>) -> Claims {
        Claims {
            user_name: Some("alice".into()),
            given_name: Some("alice".into()),
            email: Some("alice@x.com".into()),
            phone: Some("+27000000000".into()),
            role: Some("Admin".into()),
            session_id: session_id.map(str::to_string),
            iss: "iss".into(),
            aud: "aud".into(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn copies_claims_into_context() {
        let id = Uuid::new_v4();
        let context = SessionContext::from_claims(&claims(Some(&id.to_string())));
        assert_eq!(context.session_id, id);
        assert_eq!(context.role(), Some(UserRole::Admin));
        assert_eq!(context.email.as_deref(), Some("alice@x.com"));
    }

    #[test]
    fn missing_or_garbled_session_id_is_nil() {
        assert!(SessionContext::from_claims(&claims(None)).session_id.is_nil());
        assert!(SessionContext::from_claims(&claims(Some("not-a-guid")))
            .session_id
            .is_nil());
    }
}
