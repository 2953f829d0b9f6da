//! Doctor-facing handlers

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
    models::{
        AppointmentDetail, AppointmentStatus, ConversationDetail, CreateAppointmentSlotDto,
        CreateLabResultDto, CreateMedicalRecordDto, CreatePrescriptionDto,
        NotificationPreferences, UpdateClinicDto, UpdateUserDto, User,
    },
    state::AppState,
    Result,
};

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PatientsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.doctors_service.find_all().await?))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(
        state.doctors_service.find_one_with_clinic(claims.sub).await?,
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>> {
    Ok(Json(
        state.doctors_service.update_profile(claims.sub, dto).await?,
    ))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(state.doctors_service.get_dashboard(claims.sub).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Value>> {
    Ok(Json(state.doctors_service.find_one_with_clinic(id).await?))
}

pub async fn appointments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<AppointmentDetail>>> {
    Ok(Json(
        state
            .doctors_service
            .get_appointments(id, query.status, query.date)
            .await?,
    ))
}

pub async fn today_appointments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentDetail>>> {
    Ok(Json(state.doctors_service.get_today_appointments(id).await?))
}

pub async fn upcoming_appointments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentDetail>>> {
    Ok(Json(
        state.doctors_service.get_upcoming_appointments(id).await?,
    ))
}

pub async fn appointments_by_range(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<AppointmentDetail>>> {
    Ok(Json(
        state
            .doctors_service
            .get_appointments_by_range(id, query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn confirm_appointment(
    State(state): State<AppState>,
    Path((id, appointment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<crate::models::Appointment>> {
    Ok(Json(
        state
            .doctors_service
            .confirm_appointment(id, appointment_id)
            .await?,
    ))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path((id, appointment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<crate::models::Appointment>> {
    Ok(Json(
        state
            .doctors_service
            .cancel_appointment(id, appointment_id)
            .await?,
    ))
}

pub async fn patients(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PatientsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .doctors_service
            .get_patients(
                id,
                query.search.as_deref(),
                query.page.unwrap_or(1),
                query.limit.unwrap_or(10),
            )
            .await?,
    ))
}

pub async fn patient_details(
    State(state): State<AppState>,
    Path((id, patient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .doctors_service
            .get_patient_details(id, patient_id)
            .await?,
    ))
}

pub async fn reports(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OptionalRangeQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .doctors_service
            .get_reports(id, query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ConversationDetail>>> {
    Ok(Json(state.doctors_service.get_messages(id).await?))
}

pub async fn create_appointment_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateAppointmentSlotDto>,
) -> Result<impl IntoResponse> {
    let response = state
        .doctors_service
        .create_appointment_slots(id, dto)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn appointment_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OptionalRangeQuery>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .doctors_service
            .get_appointment_slots(id, query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn create_medical_record(
    State(state): State<AppState>,
    Path((id, patient_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<CreateMedicalRecordDto>,
) -> Result<impl IntoResponse> {
    let record = state
        .doctors_service
        .create_medical_record(id, patient_id, dto)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn create_lab_result(
    State(state): State<AppState>,
    Path((id, patient_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<CreateLabResultDto>,
) -> Result<impl IntoResponse> {
    let result = state
        .doctors_service
        .create_lab_result(id, patient_id, dto)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn create_prescription(
    State(state): State<AppState>,
    Path((id, patient_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<CreatePrescriptionDto>,
) -> Result<impl IntoResponse> {
    let prescription = state
        .doctors_service
        .create_prescription(id, patient_id, dto)
        .await?;
    Ok((StatusCode::CREATED, Json(prescription)))
}

pub async fn notification_preferences(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<NotificationPreferences>> {
    Ok(Json(
        state
            .doctors_service
            .get_notification_preferences(claims.sub)
            .await?,
    ))
}

pub async fn update_notification_preferences(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(preferences): Json<NotificationPreferences>,
) -> Result<Json<User>> {
    Ok(Json(
        state
            .doctors_service
            .update_notification_preferences(claims.sub, preferences)
            .await?,
    ))
}

pub async fn clinic_info(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Option<crate::models::Clinic>>> {
    Ok(Json(state.doctors_service.get_clinic_info(claims.sub).await?))
}

pub async fn update_clinic_info(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateClinicDto>,
) -> Result<Json<crate::models::Clinic>> {
    Ok(Json(
        state
            .doctors_service
            .update_clinic_info(claims.sub, dto)
            .await?,
    ))
}
