//! Clinic handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    models::{clinic::ClinicWithDoctors, Clinic, CreateClinicDto, UpdateClinicDto},
    state::AppState,
    Result,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateClinicDto>,
) -> Result<impl IntoResponse> {
    let clinic = state.clinics_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(clinic)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClinicWithDoctors>>> {
    Ok(Json(state.clinics_service.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClinicWithDoctors>> {
    Ok(Json(state.clinics_service.find_one(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateClinicDto>,
) -> Result<Json<Clinic>> {
    Ok(Json(state.clinics_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.clinics_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
