//! Medical record rows and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "medical_record_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MedicalRecordCategory {
    Diagnosis,
    Medication,
    Allergy,
    Vaccination,
    LabResult,
    Other,
}

impl MedicalRecordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicalRecordCategory::Diagnosis => "diagnosis",
            MedicalRecordCategory::Medication => "medication",
            MedicalRecordCategory::Allergy => "allergy",
            MedicalRecordCategory::Vaccination => "vaccination",
            MedicalRecordCategory::LabResult => "lab_result",
            MedicalRecordCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MedicalRecordCategory::Diagnosis => "Diagnosis",
            MedicalRecordCategory::Medication => "Medication",
            MedicalRecordCategory::Allergy => "Allergy",
            MedicalRecordCategory::Vaccination => "Vaccination",
            MedicalRecordCategory::LabResult => "Lab Result",
            MedicalRecordCategory::Other => "Other",
        }
    }

    /// Accepts both the enum value and the frontend tab labels.
    pub fn from_query(value: &str) -> Option<&'static str> {
        match value {
            "All Records" => Some("all"),
            "Diagnoses" | "diagnosis" => Some("diagnosis"),
            "Medications" | "medication" => Some("medication"),
            "Allergies" | "allergy" => Some("allergy"),
            "Vaccinations" | "vaccination" => Some("vaccination"),
            "Lab Results" | "lab_result" => Some("lab_result"),
            "other" => Some("other"),
            "all" => Some("all"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub category: MedicalRecordCategory,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub attachments: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordDetail {
    #[serde(flatten)]
    pub record: MedicalRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<UserSummary>,
}

impl MedicalRecordDetail {
    pub fn doctor_name(&self) -> String {
        self.doctor
            .as_ref()
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| "Unknown Provider".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalRecordDto {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub category: MedicalRecordCategory,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicalRecordDto {
    pub category: Option<MedicalRecordCategory>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub attachments: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_aliases_map_to_enum_values() {
        assert_eq!(MedicalRecordCategory::from_query("Diagnoses"), Some("diagnosis"));
        assert_eq!(MedicalRecordCategory::from_query("Lab Results"), Some("lab_result"));
        assert_eq!(MedicalRecordCategory::from_query("All Records"), Some("all"));
        assert_eq!(MedicalRecordCategory::from_query("nonsense"), None);
    }
}
