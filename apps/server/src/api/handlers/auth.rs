//! Authentication handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;

use crate::{
    auth::CurrentUser,
    models::User,
    services::auth::{
        ChangePasswordDto, ForgotPasswordDto, LoginDto, RegisterDto, ResetPasswordDto,
        VerifyOtpDto,
    },
    state::AppState,
    Result,
};

pub async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.register(dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.login(dto).await?))
}

pub async fn verify(
    State(state): State<AppState>,
    Json(dto): Json<VerifyOtpDto>,
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.verify_otp(dto).await?))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(dto): Json<ForgotPasswordDto>,
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.forgot_password(dto).await?))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(dto): Json<ResetPasswordDto>,
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.reset_password(dto).await?))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<User>> {
    Ok(Json(state.auth_service.profile(claims.sub).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ChangePasswordDto>,
) -> Result<Json<Value>> {
    Ok(Json(
        state.auth_service.change_password(claims.sub, dto).await?,
    ))
}
