//! User management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    models::{CreateUserDto, UpdateUserDto, User},
    state::AppState,
    Result,
};

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> Result<impl IntoResponse> {
    let user = state.users_service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users_service.find_all().await?))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<User>> {
    Ok(Json(state.users_service.find_one(claims.sub).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<User>> {
    Ok(Json(state.users_service.find_one(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>> {
    Ok(Json(state.users_service.update(id, dto).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.users_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
