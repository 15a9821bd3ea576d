use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account owned by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemUser {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_created: DateTime<Utc>,
}

/// Account details supplied at registration, before hashing
#[derive(Debug, Clone)]
pub struct NewSystemUser {
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
}
