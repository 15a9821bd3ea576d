pub mod category;
pub mod device;
pub mod resource;
pub mod security;
pub mod zone;

pub use category::CategoryService;
pub use device::{DeviceQueryService, DeviceService};
pub use resource::{Resource, ResourceService};
pub use security::SecurityService;
pub use zone::ZoneService;

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::identity::IdentityError;

/// Outcome of a service call that did not succeed. The first five kinds
/// are expected conditions carrying a client-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
