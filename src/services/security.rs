use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::{TokenService, TokenSubject};
use crate::converters::system_user;
use crate::database::models::{SystemUser, UserSession};
use crate::database::SessionStore;
use crate::dto::{
    DtoSystemUser, DtoUserAuthenticationRequest, DtoUserAuthenticationResponse,
    DtoUserRegistrationRequest, DtoUserRegistrationResponse,
};
use crate::identity::{IdentityError, IdentityFailure, IdentityProvider};
use crate::types::UserRole;

const FAILED_LOGIN: &str = "Incorrect username and/or password. Please correct and try again";

/// Login, logout, registration and session checks
pub struct SecurityService {
    identity: Arc<dyn IdentityProvider>,
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<TokenService>,
}

impl SecurityService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        sessions: Arc<dyn SessionStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            identity,
            sessions,
            tokens,
        }
    }

    /// First assigned role, `User` when the account has none
    async fn role_of(&self, user: &SystemUser) -> ServiceResult<String> {
        let roles = self.identity.roles(user.id).await?;
        Ok(roles
            .into_iter()
            .next()
            .unwrap_or_else(|| UserRole::User.as_str().to_string()))
    }

    pub async fn login(
        &self,
        request: DtoUserAuthenticationRequest,
    ) -> ServiceResult<DtoUserAuthenticationResponse> {
        if request.username.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("Please specify a valid username".into()));
        }
        if request.password.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("Please specify a valid password".into()));
        }

        // Unknown user and wrong password must be indistinguishable
        let Some(user) = self.identity.find_by_name(request.username.trim()).await? else {
            warn!(user = %request.username, "Login failed: unknown user");
            return Err(ServiceError::Unauthorized(FAILED_LOGIN.into()));
        };
        if !self.identity.check_password(&user, &request.password).await? {
            warn!(user = %user.user_name, "Login failed: bad password");
            return Err(ServiceError::Unauthorized(FAILED_LOGIN.into()));
        }

        let role = self.role_of(&user).await?;

        let session = UserSession::start();
        self.sessions.insert(&session).await?;

        let issued = self.tokens.issue(&TokenSubject {
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            phone: user.phone_number.clone(),
            role: role.clone(),
            session_id: session.session_id,
        })?;

        info!(user = %user.user_name, session_id = %session.session_id, %role, "User logged in");

        Ok(DtoUserAuthenticationResponse {
            user: system_user::to_dto(&user, &role),
            token: issued.token,
            token_expiry: issued.expires_at,
        })
    }

    /// Close the caller's session. Missing or already-closed sessions are
    /// not an error.
    pub async fn logout(&self, session_id: Uuid) -> ServiceResult<()> {
        let closed = self.sessions.mark_logged_out(session_id, Utc::now()).await?;
        if closed {
            info!(%session_id, "Session logged out");
        } else {
            debug!(%session_id, "Logout for unknown or closed session");
        }
        Ok(())
    }

    pub async fn is_session_valid(&self, session_id: Uuid) -> ServiceResult<bool> {
        if session_id.is_nil() {
            return Ok(false);
        }
        let session = self.sessions.find(session_id).await?;
        Ok(session.map(|s| s.is_active()).unwrap_or(false))
    }

    pub async fn register(
        &self,
        request: DtoUserRegistrationRequest,
        role: UserRole,
    ) -> ServiceResult<DtoUserRegistrationResponse> {
        let required = [
            (&request.user_name, "Please specify a valid username"),
            (&request.password, "Please specify a valid password"),
            (&request.email_address, "Please specify a valid email address"),
            (&request.phone_number, "Please specify a valid phone number"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                return Err(ServiceError::InvalidArgument(message.into()));
            }
        }

        let new_user = system_user::to_new_user(&request);
        if self.identity.find_by_name(&new_user.user_name).await?.is_some() {
            return Err(ServiceError::InvalidArgument(format!(
                "A system user already exists with username = '{}'",
                new_user.user_name
            )));
        }

        let user = match self.identity.create(new_user, &request.password).await {
            Ok(user) => user,
            Err(IdentityError::Rejected(failures)) => {
                return Err(ServiceError::InvalidArgument(numbered_failures(&failures)))
            }
            Err(e) => return Err(e.into()),
        };

        let role_name = role.as_str();
        if !self.identity.role_exists(role_name).await? {
            self.identity.create_role(role_name).await?;
        }
        self.identity.add_to_role(user.id, role_name).await?;

        info!(user = %user.user_name, role = role_name, "Registered system user");

        Ok(DtoUserRegistrationResponse {
            message: "System user created successfully".into(),
            user: system_user::to_dto(&user, role_name),
        })
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> ServiceResult<DtoSystemUser> {
        if id.is_nil() {
            return Err(ServiceError::InvalidArgument(format!(
                "The user-id specified is not valid (id = '{}')",
                id
            )));
        }

        let user = self
            .identity
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No system user with id = '{}' has been found", id)))?;

        let role = self.role_of(&user).await?;
        Ok(system_user::to_dto(&user, &role))
    }
}

/// "1. Code-Description" per line
fn numbered_failures(failures: &[IdentityFailure]) -> String {
    if failures.is_empty() {
        return "An unknown error occurred. Please correct and try again".into();
    }
    let mut message = String::new();
    for (i, failure) in failures.iter().enumerate() {
        let _ = writeln!(message, "{}. {}-{}", i + 1, failure.code, failure.description);
    }
    message
}
