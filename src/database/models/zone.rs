use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Zone {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub zone_description: String,
    pub date_created: DateTime<Utc>,
}
