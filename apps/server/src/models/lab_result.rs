//! Lab result rows and DTOs. Each result stores an array of measured items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabResultStatus {
    Normal,
    BorderlineHigh,
    BorderlineLow,
    High,
    Low,
}

impl LabResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabResultStatus::Normal => "normal",
            LabResultStatus::BorderlineHigh => "borderline_high",
            LabResultStatus::BorderlineLow => "borderline_low",
            LabResultStatus::High => "high",
            LabResultStatus::Low => "low",
        }
    }

    /// "borderline_high" -> "Borderline High"
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
pub struct LabResultItem {
    pub name: String,
    /// Numeric or free-text value, as recorded by the lab.
    pub value: serde_json::Value,
    pub unit: String,
    pub status: LabResultStatus,
    pub reference_range: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub test_name: String,
    pub test_date: NaiveDate,
    pub results: Json<Vec<LabResultItem>>,
    pub doctor_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultDetail {
    #[serde(flatten)]
    pub result: LabResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<UserSummary>,
}

impl LabResultDetail {
    pub fn doctor_name(&self) -> String {
        self.doctor
            .as_ref()
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| "Unknown Doctor".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabResultDto {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub test_name: String,
    pub test_date: NaiveDate,
    pub results: Vec<LabResultItem>,
    pub doctor_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabResultDto {
    pub test_name: Option<String>,
    pub test_date: Option<NaiveDate>,
    pub results: Option<Vec<LabResultItem>>,
    pub doctor_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_titlecases_words() {
        assert_eq!(LabResultStatus::Normal.display_name(), "Normal");
        assert_eq!(LabResultStatus::BorderlineHigh.display_name(), "Borderline High");
    }
}
