//! Patient-facing handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    models::{AppointmentStatus, PrescriptionStatus, UpdateUserDto, User},
    services::patients::{BookAppointmentDto, RescheduleDto},
    state::AppState,
    Result,
};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultsQuery {
    pub test_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionsQuery {
    pub status: Option<PrescriptionStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    pub conversation_id: Option<Uuid>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.patients_service.find_all().await?))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<User>> {
    Ok(Json(state.patients_service.find_one(claims.sub).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>> {
    Ok(Json(
        state
            .patients_service
            .update_profile(claims.sub, dto)
            .await?,
    ))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(state.patients_service.get_dashboard(claims.sub).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<User>> {
    Ok(Json(state.patients_service.find_one(id).await?))
}

pub async fn appointments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .patients_service
            .get_appointments(id, query.status)
            .await?,
    ))
}

pub async fn upcoming_appointments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state.patients_service.get_upcoming_appointments(id).await?,
    ))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<BookAppointmentDto>,
) -> Result<impl IntoResponse> {
    let appointment = state.patients_service.book_appointment(id, dto).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path((id, appointment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<crate::models::Appointment>> {
    Ok(Json(
        state
            .patients_service
            .cancel_appointment(id, appointment_id)
            .await?,
    ))
}

pub async fn reschedule_appointment(
    State(state): State<AppState>,
    Path((id, appointment_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<RescheduleDto>,
) -> Result<Json<crate::models::Appointment>> {
    Ok(Json(
        state
            .patients_service
            .reschedule_appointment(id, appointment_id, dto)
            .await?,
    ))
}

pub async fn medical_records(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .patients_service
            .get_medical_records(
                id,
                query.category.as_deref(),
                query.page.unwrap_or(1),
                query.limit.unwrap_or(10),
            )
            .await?,
    ))
}

pub async fn lab_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LabResultsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .patients_service
            .get_lab_results(
                id,
                query.test_type.as_deref(),
                query.start_date,
                query.end_date,
            )
            .await?,
    ))
}

pub async fn prescriptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PrescriptionsQuery>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .patients_service
            .get_prescriptions(id, query.status)
            .await?,
    ))
}

pub async fn active_prescriptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state.patients_service.get_active_prescriptions(id).await?,
    ))
}

pub async fn request_refill(
    State(state): State<AppState>,
    Path((id, prescription_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<crate::models::Prescription>> {
    Ok(Json(
        state
            .patients_service
            .request_prescription_refill(id, prescription_id)
            .await?,
    ))
}

pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .patients_service
            .get_messages(id, query.conversation_id)
            .await?,
    ))
}
