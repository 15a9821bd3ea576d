pub mod auth;
pub mod response;
pub mod role;
pub mod session;

pub use auth::jwt_auth_middleware;
pub use response::{ApiResponse, ApiResult};
pub use role::{require_admin, require_authenticated_role};
pub use session::{session_middleware, SessionContext};
