//! Service layer - business rules and response shaping

pub mod admin;
pub mod appointments;
pub mod assistants;
pub mod auth;
pub mod clinics;
pub mod doctors;
pub mod fmt;
pub mod home_page;
pub mod lab_results;
pub mod medical_records;
pub mod messages;
pub mod patients;
pub mod prescriptions;
pub mod users;

pub use admin::AdminService;
pub use appointments::AppointmentsService;
pub use assistants::AssistantsService;
pub use auth::AuthService;
pub use clinics::ClinicsService;
pub use doctors::DoctorsService;
pub use home_page::HomePageService;
pub use lab_results::LabResultsService;
pub use medical_records::MedicalRecordsService;
pub use messages::MessagesService;
pub use patients::PatientsService;
pub use prescriptions::PrescriptionsService;
pub use users::UsersService;

/// Merge extra key/value pairs into the JSON serialization of `value`.
///
/// Used by the dashboard/list shaping code that decorates entity rows with
/// display fields.
pub(crate) fn merge_json(
    value: serde_json::Value,
    extras: serde_json::Value,
) -> serde_json::Value {
    match (value, extras) {
        (serde_json::Value::Object(mut base), serde_json::Value::Object(extras)) => {
            for (key, extra) in extras {
                base.insert(key, extra);
            }
            serde_json::Value::Object(base)
        }
        (base, _) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_json_overrides_and_extends() {
        let merged = merge_json(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4}));
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
    }
}
