//! Prescription rows and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "prescription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Cancelled,
    RefillRequested,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Completed => "completed",
            PrescriptionStatus::Cancelled => "cancelled",
            PrescriptionStatus::RefillRequested => "refill_requested",
        }
    }

    /// "refill_requested" -> "Refill Requested"
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub medications: Json<Vec<Medication>>,
    pub status: PrescriptionStatus,
    pub prescribed_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub refills_remaining: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDetail {
    #[serde(flatten)]
    pub prescription: Prescription,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<UserSummary>,
}

impl PrescriptionDetail {
    pub fn doctor_name(&self) -> String {
        self.doctor
            .as_ref()
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| "Unknown Doctor".to_string())
    }

    pub fn doctor_specialty(&self) -> String {
        self.doctor
            .as_ref()
            .and_then(|d| d.specialty.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionDto {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub medications: Vec<Medication>,
    pub status: Option<PrescriptionStatus>,
    pub prescribed_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub refills_remaining: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrescriptionDto {
    pub medications: Option<Vec<Medication>>,
    pub status: Option<PrescriptionStatus>,
    pub prescribed_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub refills_remaining: Option<i32>,
}
