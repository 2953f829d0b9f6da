//! Database layer - repositories and data access

pub mod appointments;
pub mod clinics;
pub mod home_page;
pub mod lab_results;
pub mod medical_records;
pub mod messages;
pub mod prescriptions;
pub mod shifts;
pub mod users;

pub use appointments::{AppointmentRepository, SlotRepository};
pub use clinics::ClinicRepository;
pub use home_page::HomePageRepository;
pub use lab_results::LabResultRepository;
pub use medical_records::MedicalRecordRepository;
pub use messages::MessageRepository;
pub use prescriptions::PrescriptionRepository;
pub use shifts::ShiftRepository;
pub use users::UserRepository;
