use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Device, UserSession};

/// Single-table persistence for a keyed entity.
/// Infrastructure (PostgreSQL, in-memory fakes) implements this per entity.
#[async_trait]
pub trait EntityStore<E>: Send + Sync
where
    E: Send + Sync + 'static,
{
    async fn find(&self, id: Uuid) -> Result<Option<E>, DatabaseError>;

    async fn list(&self) -> Result<Vec<E>, DatabaseError>;

    /// Insert a new row. A primary-key collision is `DatabaseError::Duplicate`.
    async fn insert(&self, entity: &E) -> Result<(), DatabaseError>;

    /// Overwrite the mutable columns of an existing row
    async fn update(&self, entity: &E) -> Result<(), DatabaseError>;

    /// Physically remove the row; false when nothing matched
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// True when other rows still reference this one
    async fn has_dependents(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Device lookups by their soft references
#[async_trait]
pub trait DeviceLookup: Send + Sync {
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Device>, DatabaseError>;

    async fn list_by_zone(&self, zone_id: Uuid) -> Result<Vec<Device>, DatabaseError>;

    /// Distinct zones holding at least one device of the category
    async fn count_zones_for_category(&self, category_id: Uuid) -> Result<i64, DatabaseError>;
}

/// Login session rows
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &UserSession) -> Result<(), DatabaseError>;

    async fn find(&self, session_id: Uuid) -> Result<Option<UserSession>, DatabaseError>;

    /// Stamp `logout_date` on an active session. Returns false when the
    /// session does not exist or is already logged out.
    async fn mark_logged_out(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError>;
}
