use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Device row. `category_id` and `zone_id` are soft references; the
/// database does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub device_id: Uuid,
    pub device_name: String,
    pub category_id: Uuid,
    pub zone_id: Uuid,
    pub status: String,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}
