//! Wire shapes for request and response bodies. Field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields every resource DTO carries. A missing `id` deserializes to the
/// nil GUID so the service can reject it with a proper message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoBase {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

impl DtoBase {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            date_created: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoCategory {
    #[serde(flatten)]
    pub base: DtoBase,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoZone {
    #[serde(flatten)]
    pub base: DtoBase,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub zone_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoDevice {
    #[serde(flatten)]
    pub base: DtoBase,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub category_id: Uuid,
    #[serde(default)]
    pub zone_id: Uuid,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Public profile of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoSystemUser {
    pub id: Uuid,
    pub user_name: String,
    pub email_address: String,
    pub phone_number: String,
    pub role_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoUserAuthenticationRequest {
    #[serde(default, alias = "userName")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoUserAuthenticationResponse {
    pub user: DtoSystemUser,
    pub token: String,
    pub token_expiry: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoUserRegistrationRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoUserRegistrationResponse {
    pub message: String,
    pub user: DtoSystemUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtoMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_uses_camel_case_and_flattened_base() {
        let id = Uuid::new_v4();
        let dto = DtoCategory {
            base: DtoBase::new(id),
            category_name: "HVAC".to_string(),
            category_description: "Climate".to_string(),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["id"], json!(id));
        assert_eq!(value["categoryName"], "HVAC");
        assert_eq!(value["categoryDescription"], "Climate");
        assert!(value["dateCreated"].is_null());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dto: DtoDevice = serde_json::from_value(json!({ "deviceName": "Thermostat" })).unwrap();
        assert!(dto.base.id.is_nil());
        assert!(dto.category_id.is_nil());
        assert!(!dto.is_active);
        assert_eq!(dto.device_name, "Thermostat");
    }

    #[test]
    fn login_accepts_either_user_name_spelling() {
        let a: DtoUserAuthenticationRequest =
            serde_json::from_value(json!({ "username": "alice", "password": "p" })).unwrap();
        let b: DtoUserAuthenticationRequest =
            serde_json::from_value(json!({ "userName": "alice", "password": "p" })).unwrap();
        assert_eq!(a.username, "alice");
        assert_eq!(b.username, "alice");
    }
}
