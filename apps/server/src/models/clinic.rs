//! Clinic rows and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use super::UserSummary;

/// Opening hours keyed by lowercase weekday name.
pub type OperatingHours = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<Json<OperatingHours>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Clinic plus the doctors attached to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicWithDoctors {
    #[serde(flatten)]
    pub clinic: Clinic,
    pub doctors: Vec<UserSummary>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicDto {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClinicDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<OperatingHours>,
}

/// Default weekday schedule applied when a doctor creates a clinic without
/// specifying hours.
pub fn default_operating_hours() -> OperatingHours {
    let mut hours = OperatingHours::new();
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
        hours.insert(
            day.to_string(),
            serde_json::json!({ "open": "09:00", "close": "17:00" }),
        );
    }
    hours.insert(
        "saturday".to_string(),
        serde_json::json!({ "open": "09:00", "close": "13:00" }),
    );
    hours.insert("sunday".to_string(), serde_json::json!({ "closed": true }));
    hours
}
