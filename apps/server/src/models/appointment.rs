//! Appointment and appointment-slot rows and DTOs.
//!
//! A slot is a bookable unit of a doctor's calendar. It moves
//! available -> booked when an appointment is created against it and back to
//! available when that appointment is cancelled or rescheduled elsewhere.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use super::{hhmm, ClinicSummary, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
        AppointmentStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Rescheduled => "rescheduled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    CheckUp,
    Emergency,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Consultation => "consultation",
            AppointmentType::FollowUp => "follow-up",
            AppointmentType::CheckUp => "check-up",
            AppointmentType::Emergency => "emergency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: i32,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Reason shown in lists: explicit reason, falling back to the type.
    pub fn display_reason(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| self.appointment_type.as_str().to_string())
    }
}

/// Appointment joined with its patient, doctor, and clinic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<ClinicSummary>,
}

impl AppointmentDetail {
    pub fn patient_name(&self) -> String {
        self.patient
            .as_ref()
            .map(|p| p.full_name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn doctor_name(&self) -> String {
        self.doctor
            .as_ref()
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| "Unknown Doctor".to_string())
    }

    pub fn doctor_initial(&self) -> String {
        self.doctor
            .as_ref()
            .map(|d| d.initial())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn doctor_specialty(&self) -> String {
        self.doctor
            .as_ref()
            .and_then(|d| d.specialty.clone())
            .unwrap_or_default()
    }

    pub fn clinic_name(&self) -> String {
        self.clinic
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: i32,
    pub clinic_id: Option<Uuid>,
    pub associated_resources: Option<Json<Vec<String>>>,
    pub status: SlotStatus,
    pub appointment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentDto {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[validate(range(min = 1))]
    pub duration: i32,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type")]
    pub appointment_type: Option<AppointmentType>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentDto {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    pub time: Option<NaiveTime>,
    pub duration: Option<i32>,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type")]
    pub appointment_type: Option<AppointmentType>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    None,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentSlotDto {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[validate(range(min = 1))]
    pub slot_duration: i32,
    pub clinic_id: Option<Uuid>,
    pub associated_resources: Option<Vec<String>>,
    pub recurrence: Option<RecurrenceType>,
    /// Millisecond timestamp bounding the recurrence; defaults to 30 days out.
    pub recurrence_end_date: Option<i64>,
}
