//! Admin handlers (role-guarded by middleware)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    models::{AppointmentStatus, UserRole},
    services::admin::{AppointmentListParams, UserListParams},
    state::AppState,
    Result,
};

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ClinicsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.admin_service.get_dashboard_stats().await?))
}

pub async fn users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .admin_service
            .get_all_users(UserListParams {
                role: query.role,
                search: query.search,
                page: query.page.unwrap_or(1),
                limit: query.limit.unwrap_or(10),
            })
            .await?,
    ))
}

pub async fn user_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    Ok(Json(state.admin_service.get_user_details(id).await?))
}

pub async fn appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .admin_service
            .get_all_appointments(AppointmentListParams {
                status: query.status,
                doctor_id: query.doctor_id,
                patient_id: query.patient_id,
                start_date: query.start_date,
                end_date: query.end_date,
                page: query.page.unwrap_or(1),
                limit: query.limit.unwrap_or(10),
            })
            .await?,
    ))
}

pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .admin_service
            .get_analytics(query.start_date, query.end_date)
            .await?,
    ))
}

pub async fn clinics(
    State(state): State<AppState>,
    Query(query): Query<ClinicsQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state
            .admin_service
            .get_all_clinics(
                query.search.as_deref(),
                query.page.unwrap_or(1),
                query.limit.unwrap_or(10),
            )
            .await?,
    ))
}
