//! Home page content handlers. Reads are public; updates require a token.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    auth::CurrentUser,
    models::{HomePageContent, UpdateHomePageContentDto},
    state::AppState,
    Result,
};

pub async fn get_content(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.home_page_service.get_content().await?))
}

pub async fn update_content(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(dto): Json<UpdateHomePageContentDto>,
) -> Result<Json<HomePageContent>> {
    Ok(Json(state.home_page_service.update_content(dto).await?))
}
