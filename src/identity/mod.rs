pub mod password;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{NewSystemUser, SystemUser};
use crate::database::DatabaseError;

pub use password::{PasswordHasher, PasswordPolicy};
pub use postgres::PgIdentityProvider;

/// One reason the provider refused to create an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFailure {
    pub code: String,
    pub description: String,
}

impl IdentityFailure {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity provider rejected the request ({} failure(s))", .0.len())]
    Rejected(Vec<IdentityFailure>),
    #[error("Password hashing error: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Account, password and role storage. The rest of the API only sees
/// accounts through this seam.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<SystemUser>, IdentityError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SystemUser>, IdentityError>;

    /// Validate, hash the password and persist the account
    async fn create(&self, user: NewSystemUser, password: &str) -> Result<SystemUser, IdentityError>;

    async fn check_password(&self, user: &SystemUser, password: &str) -> Result<bool, IdentityError>;

    /// Role names in assignment order
    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, IdentityError>;

    async fn role_exists(&self, role: &str) -> Result<bool, IdentityError>;

    async fn create_role(&self, role: &str) -> Result<(), IdentityError>;

    async fn add_to_role(&self, user_id: Uuid, role: &str) -> Result<(), IdentityError>;
}
