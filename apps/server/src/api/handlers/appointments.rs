//! Appointment handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    models::{Appointment, AppointmentDetail, CreateAppointmentDto, UpdateAppointmentDto},
    state::AppState,
    Result,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateAppointmentDto>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointments_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AppointmentDetail>>> {
    let appointments = if let Some(patient_id) = query.patient_id {
        state.appointments_service.find_by_patient(patient_id).await?
    } else if let Some(doctor_id) = query.doctor_id {
        state.appointments_service.find_by_doctor(doctor_id).await?
    } else {
        state.appointments_service.find_all().await?
    };
    Ok(Json(appointments))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDetail>> {
    Ok(Json(state.appointments_service.find_one(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateAppointmentDto>,
) -> Result<Json<Appointment>> {
    Ok(Json(state.appointments_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.appointments_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
