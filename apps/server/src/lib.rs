//! Clinic management backend
//!
//! A REST API over PostgreSQL covering:
//! - User and role management (admin, doctor, patient, assistant)
//! - Appointment booking with slot allocation
//! - Medical records, lab results, and prescriptions
//! - Patient/doctor messaging
//! - Role dashboards and admin analytics

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
