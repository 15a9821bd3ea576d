use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per successful login. A session is active until `logout_date`
/// is set, after which it can never be reactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    pub session_id: Uuid,
    pub date_created: DateTime<Utc>,
    pub logout_date: Option<DateTime<Utc>>,
}

impl UserSession {
    /// Fresh, active session stamped with the current time
    pub fn start() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            date_created: Utc::now(),
            logout_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.logout_date.is_none()
    }
}
