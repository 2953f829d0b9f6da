//! Domain models - row structs, enums, and request/response DTOs

pub mod appointment;
pub mod clinic;
pub mod home_page;
pub mod lab_result;
pub mod medical_record;
pub mod message;
pub mod prescription;
pub mod shift;
pub mod user;

pub use appointment::{
    Appointment, AppointmentDetail, AppointmentSlot, AppointmentStatus, AppointmentType,
    CreateAppointmentDto, CreateAppointmentSlotDto, RecurrenceType, SlotStatus,
    UpdateAppointmentDto,
};
pub use clinic::{Clinic, ClinicSummary, CreateClinicDto, UpdateClinicDto};
pub use home_page::{HomePageContent, UpdateHomePageContentDto};
pub use lab_result::{CreateLabResultDto, LabResult, LabResultDetail, LabResultItem,
    LabResultStatus, UpdateLabResultDto};
pub use medical_record::{
    CreateMedicalRecordDto, MedicalRecord, MedicalRecordCategory, MedicalRecordDetail,
    UpdateMedicalRecordDto,
};
pub use message::{
    Conversation, ConversationDetail, CreateMessageDto, Message, MessageDetail,
};
pub use prescription::{
    CreatePrescriptionDto, Medication, Prescription, PrescriptionDetail, PrescriptionStatus,
    UpdatePrescriptionDto,
};
pub use shift::{AssistantShift, CreateShiftDto, ShiftDetail, ShiftStatus, UpdateShiftDto};
pub use user::{
    CreateUserDto, EmergencyContact, NotificationPreferences, UpdateUserDto, User, UserRole,
    UserSummary,
};

use serde::Serialize;

/// Pagination envelope shared by the list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            total / limit + (total % limit != 0) as i64
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Serde helpers for TIME columns exchanged as "HH:MM" strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|_| format!("Invalid time value: {s}"))
    }

    /// Variant for `Option<NaiveTime>` fields.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match time {
                Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value: Option<String> = Option::deserialize(deserializer)?;
            value
                .map(|s| super::parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up() {
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
        assert_eq!(Pagination::new(10, 1, 10).total_pages, 1);
        assert_eq!(Pagination::new(11, 1, 10).total_pages, 2);
        assert_eq!(Pagination::new(5, 2, 0).total_pages, 0);
    }

    #[test]
    fn hhmm_parses_both_forms() {
        assert_eq!(hhmm::parse("09:30").unwrap().format("%H:%M:%S").to_string(), "09:30:00");
        assert_eq!(hhmm::parse("09:30:15").unwrap().format("%H:%M:%S").to_string(), "09:30:15");
        assert!(hhmm::parse("9 thirty").is_err());
    }
}
