//! Lab result handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    models::{CreateLabResultDto, LabResult, LabResultDetail, UpdateLabResultDto},
    state::AppState,
    Result,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateLabResultDto>,
) -> Result<impl IntoResponse> {
    let result = state.lab_results_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<LabResultDetail>>> {
    Ok(Json(state.lab_results_service.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LabResultDetail>> {
    Ok(Json(state.lab_results_service.find_one(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateLabResultDto>,
) -> Result<Json<LabResult>> {
    Ok(Json(state.lab_results_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.lab_results_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
