//! User rows and DTOs. A single table carries all four roles; doctor and
//! assistant specific columns are nullable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Patient,
    Assistant,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "doctor",
            UserRole::Patient => "patient",
            UserRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvents {
    pub new_appointment: bool,
    pub appointment_reminder: bool,
    pub appointment_cancellation: bool,
    pub new_message: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMethods {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub events: NotificationEvents,
    pub delivery_methods: DeliveryMethods,
    pub quiet_hours: QuietHours,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            events: NotificationEvents {
                new_appointment: true,
                appointment_reminder: true,
                appointment_cancellation: true,
                new_message: false,
            },
            delivery_methods: DeliveryMethods {
                email: true,
                sms: false,
                push: true,
            },
            quiet_hours: QuietHours {
                enabled: false,
                start_time: "22:00".to_string(),
                end_time: "08:00".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub full_name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_verified: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: Option<i32>,
    pub permissions: Option<Vec<String>>,
    pub doctor_id: Option<Uuid>,
    pub notification_preferences: Option<Json<NotificationPreferences>>,
    pub clinic_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First letter of the full name, used as an avatar fallback.
    pub fn initial(&self) -> String {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Public projection of a user embedded in joined responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: Option<String>,
    pub specialty: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserSummary {
    pub fn initial(&self) -> String {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(email)]
    pub email: String,
    pub phone_number: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: Option<i32>,
    pub is_verified: Option<bool>,
    pub clinic_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_dto_rejects_bad_email() {
        let dto = CreateUserDto {
            email: "not-an-email".to_string(),
            phone_number: "+8801234567890".to_string(),
            password: "secret1".to_string(),
            full_name: "Test User".to_string(),
            role: UserRole::Patient,
            date_of_birth: None,
            gender: None,
            specialty: None,
            license_number: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn role_round_trips_through_serde() {
        let json = serde_json::to_string(&UserRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: UserRole = serde_json::from_str("\"doctor\"").unwrap();
        assert_eq!(role, UserRole::Doctor);
    }
}
