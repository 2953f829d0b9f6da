//! Medical record handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    models::{CreateMedicalRecordDto, MedicalRecord, MedicalRecordDetail, UpdateMedicalRecordDto},
    state::AppState,
    Result,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateMedicalRecordDto>,
) -> Result<impl IntoResponse> {
    let record = state.medical_records_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MedicalRecordDetail>>> {
    Ok(Json(state.medical_records_service.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalRecordDetail>> {
    Ok(Json(state.medical_records_service.find_one(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateMedicalRecordDto>,
) -> Result<Json<MedicalRecord>> {
    Ok(Json(state.medical_records_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.medical_records_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
