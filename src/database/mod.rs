pub mod manager;
pub mod models;
pub mod repository;
pub mod retry;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager, HealthProbe};
pub use repository::{PgRepository, Table};
pub use store::{DeviceLookup, EntityStore, SessionStore};
