//! REST API routes
//!
//! All routes live under the `/api` prefix. The bearer-token middleware is
//! layered over the whole tree (the auth endpoints and the public home page
//! read are exempt); `/api/admin` additionally requires the admin role.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{
    admin, appointments, assistants, auth, clinics, doctors, home_page, lab_results,
    medical_records, messages, patients, users,
};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/patients", patient_routes())
        .nest("/doctors", doctor_routes())
        .nest("/assistants", assistant_routes())
        .nest("/appointments", appointment_routes())
        .nest("/medical-records", medical_record_routes())
        .nest("/lab-results", lab_result_routes())
        .nest("/messages", message_routes())
        .nest("/clinics", clinic_routes())
        .nest("/home-page-content", home_page_routes())
        .nest(
            "/admin",
            admin_routes().layer(axum::middleware::from_fn(crate::auth::admin_middleware)),
        )
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", post(auth::verify))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/profile", post(auth::profile))
        .route("/change-password", post(auth::change_password))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create).get(users::list))
        .route("/profile", get(users::profile))
        .route(
            "/:id",
            get(users::get).patch(users::update).delete(users::remove),
        )
}

fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(patients::list))
        .route(
            "/profile",
            get(patients::profile).patch(patients::update_profile),
        )
        .route("/dashboard", get(patients::dashboard))
        .route("/:id", get(patients::get))
        .route(
            "/:id/appointments",
            get(patients::appointments).post(patients::book_appointment),
        )
        .route(
            "/:id/appointments/upcoming",
            get(patients::upcoming_appointments),
        )
        .route(
            "/:id/appointments/:appointment_id/cancel",
            post(patients::cancel_appointment),
        )
        .route(
            "/:id/appointments/:appointment_id/reschedule",
            post(patients::reschedule_appointment),
        )
        .route("/:id/medical-records", get(patients::medical_records))
        .route("/:id/lab-results", get(patients::lab_results))
        .route("/:id/prescriptions", get(patients::prescriptions))
        .route(
            "/:id/prescriptions/active",
            get(patients::active_prescriptions),
        )
        .route(
            "/:id/prescriptions/:prescription_id/refill",
            post(patients::request_refill),
        )
        .route("/:id/messages", get(patients::messages))
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(doctors::list))
        .route(
            "/profile",
            get(doctors::profile).patch(doctors::update_profile),
        )
        .route(
            "/profile/notifications",
            get(doctors::notification_preferences)
                .patch(doctors::update_notification_preferences),
        )
        .route(
            "/profile/clinic",
            get(doctors::clinic_info).patch(doctors::update_clinic_info),
        )
        .route("/dashboard", get(doctors::dashboard))
        .route("/:id", get(doctors::get))
        .route("/:id/appointments", get(doctors::appointments))
        .route("/:id/appointments/today", get(doctors::today_appointments))
        .route(
            "/:id/appointments/upcoming",
            get(doctors::upcoming_appointments),
        )
        .route("/:id/appointments/range", get(doctors::appointments_by_range))
        .route(
            "/:id/appointments/:appointment_id/confirm",
            post(doctors::confirm_appointment),
        )
        .route(
            "/:id/appointments/:appointment_id/cancel",
            post(doctors::cancel_appointment),
        )
        .route("/:id/patients", get(doctors::patients))
        .route("/:id/patients/:patient_id", get(doctors::patient_details))
        .route("/:id/reports", get(doctors::reports))
        .route("/:id/messages", get(doctors::messages))
        .route(
            "/:id/appointment-slots",
            post(doctors::create_appointment_slots).get(doctors::appointment_slots),
        )
        .route(
            "/:id/patients/:patient_id/medical-records",
            post(doctors::create_medical_record),
        )
        .route(
            "/:id/patients/:patient_id/lab-results",
            post(doctors::create_lab_result),
        )
        .route(
            "/:id/patients/:patient_id/prescriptions",
            post(doctors::create_prescription),
        )
}

fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(assistants::create).get(assistants::list))
        .route(
            "/profile",
            get(assistants::profile).patch(assistants::update_profile),
        )
        .route(
            "/profile/notifications",
            get(assistants::notification_preferences)
                .patch(assistants::update_notification_preferences),
        )
        .route("/profile/clinic", get(assistants::clinic_info))
        .route("/dashboard", get(assistants::dashboard))
        .route("/appointments", get(assistants::appointments))
        .route(
            "/appointments/statistics",
            get(assistants::appointment_statistics),
        )
        .route("/appointments/range", get(assistants::appointments_by_range))
        .route("/appointments/today", get(assistants::today_appointments))
        .route("/patients", get(assistants::patients))
        .route("/patients/statistics", get(assistants::patient_statistics))
        .route("/patients/:patient_id", get(assistants::patient_details))
        .route("/reports", get(assistants::reports))
        .route("/messages", get(assistants::messages))
        .route(
            "/messages/:conversation_id",
            get(assistants::conversation_messages),
        )
        .route("/shifts/all/list", get(assistants::all_shifts))
        .route(
            "/shifts/:shift_id",
            get(assistants::get_shift)
                .patch(assistants::update_shift)
                .delete(assistants::delete_shift),
        )
        .route(
            "/:id",
            get(assistants::get)
                .patch(assistants::update)
                .delete(assistants::remove),
        )
        .route(
            "/:id/shifts",
            get(assistants::shifts_for).post(assistants::create_shift),
        )
}

fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(appointments::create).get(appointments::list))
        .route(
            "/:id",
            get(appointments::get)
                .patch(appointments::update)
                .delete(appointments::remove),
        )
}

fn medical_record_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(medical_records::create).get(medical_records::list))
        .route(
            "/:id",
            get(medical_records::get)
                .patch(medical_records::update)
                .delete(medical_records::remove),
        )
}

fn lab_result_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(lab_results::create).get(lab_results::list))
        .route(
            "/:id",
            get(lab_results::get)
                .patch(lab_results::update)
                .delete(lab_results::remove),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::create))
        .route("/conversations", get(messages::conversations))
        .route(
            "/conversations/:conversation_id",
            get(messages::conversation_messages),
        )
        .route("/:id/read", post(messages::mark_read))
}

fn clinic_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(clinics::create).get(clinics::list))
        .route(
            "/:id",
            get(clinics::get)
                .patch(clinics::update)
                .delete(clinics::remove),
        )
}

fn home_page_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(home_page::get_content).patch(home_page::update_content),
    )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", get(admin::users))
        .route("/users/:id", get(admin::user_details))
        .route("/appointments", get(admin::appointments))
        .route("/analytics", get(admin::analytics))
        .route("/clinics", get(admin::clinics))
}
