//! Assistant-facing handlers

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
    db::shifts::ShiftFilter,
    models::{
        AppointmentStatus, ConversationDetail, CreateShiftDto, MessageDetail,
        NotificationPreferences, ShiftDetail, UpdateShiftDto, UpdateUserDto,
    },
    services::assistants::{AppointmentListFilter, CreateAssistantDto, UpdateAssistantDto},
    state::AppState,
    Result,
};

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub filter: Option<AppointmentListFilter>,
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftsQuery {
    pub assistant_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub clinic_location: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateAssistantDto>,
) -> Result<impl IntoResponse> {
    let assistant = state.assistants_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(assistant)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.assistants_service.find_all().await?))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(
        state.assistants_service.find_one_formatted(claims.sub).await?,
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .assistants_service
            .update_profile(claims.sub, dto)
            .await?,
    ))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(state.assistants_service.get_dashboard(claims.sub).await?))
}

pub async fn appointments(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .assistants_service
            .get_appointments(claims.sub, query.status, query.filter)
            .await?,
    ))
}

pub async fn appointment_statistics(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .assistants_service
            .get_appointment_statistics(claims.sub)
            .await?,
    ))
}

pub async fn appointments_by_range(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .assistants_service
            .get_appointments_by_range(claims.sub, query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn today_appointments(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state.assistants_service.get_today_appointments(claims.sub).await?,
    ))
}

pub async fn patients(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(query): Query<PatientsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .assistants_service
            .get_patients(
                claims.sub,
                query.search.as_deref(),
                query.page.unwrap_or(1),
                query.limit.unwrap_or(10),
            )
            .await?,
    ))
}

pub async fn patient_statistics(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(
        state.assistants_service.get_patient_statistics(claims.sub).await?,
    ))
}

pub async fn patient_details(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .assistants_service
            .get_patient_details(claims.sub, patient_id)
            .await?,
    ))
}

pub async fn reports(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(query): Query<OptionalRangeQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .assistants_service
            .get_reports(claims.sub, query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn messages(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<ConversationDetail>>> {
    Ok(Json(state.assistants_service.get_messages(claims.sub).await?))
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDetail>>> {
    Ok(Json(
        state
            .assistants_service
            .get_conversation_messages(claims.sub, conversation_id)
            .await?,
    ))
}

pub async fn notification_preferences(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<NotificationPreferences>> {
    Ok(Json(
        state
            .assistants_service
            .get_notification_preferences(claims.sub)
            .await?,
    ))
}

pub async fn update_notification_preferences(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(preferences): Json<NotificationPreferences>,
) -> Result<Json<NotificationPreferences>> {
    Ok(Json(
        state
            .assistants_service
            .update_notification_preferences(claims.sub, preferences)
            .await?,
    ))
}

pub async fn clinic_info(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Option<crate::models::Clinic>>> {
    Ok(Json(
        state.assistants_service.get_clinic_info(claims.sub).await?,
    ))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Value>> {
    Ok(Json(state.assistants_service.find_one_formatted(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateAssistantDto>,
) -> Result<Json<Value>> {
    Ok(Json(state.assistants_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.assistants_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Shifts

pub async fn shifts_for(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OptionalRangeQuery>,
) -> Result<Json<Vec<ShiftDetail>>> {
    Ok(Json(
        state
            .assistants_service
            .get_shifts(ShiftFilter {
                assistant_id: Some(id),
                start_date: query.start_date,
                end_date: query.end_date,
                clinic_location: None,
            })
            .await?,
    ))
}

pub async fn create_shift(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateShiftDto>,
) -> Result<impl IntoResponse> {
    let shift = state.assistants_service.create_shift(id, dto).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

pub async fn get_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
) -> Result<Json<ShiftDetail>> {
    Ok(Json(state.assistants_service.find_shift(shift_id).await?))
}

pub async fn update_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
    Json(dto): Json<UpdateShiftDto>,
) -> Result<Json<ShiftDetail>> {
    Ok(Json(
        state.assistants_service.update_shift(shift_id, dto).await?,
    ))
}

pub async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.assistants_service.delete_shift(shift_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn all_shifts(
    State(state): State<AppState>,
    Query(query): Query<ShiftsQuery>,
) -> Result<Json<Vec<ShiftDetail>>> {
    Ok(Json(
        state
            .assistants_service
            .get_shifts(ShiftFilter {
                assistant_id: query.assistant_id,
                start_date: query.start_date,
                end_date: query.end_date,
                clinic_location: query.clinic_location,
            })
            .await?,
    ))
}
