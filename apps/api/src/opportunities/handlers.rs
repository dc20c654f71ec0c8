//! Axum route handlers for the Opportunity API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{ApplicationStatus, Opportunity};
use crate::opportunities::post_opportunity;
use crate::opportunities::search::{filter_opportunities, unique_locations, OpportunityFilter};
use crate::opportunities::validation::{validate_opportunity, OpportunityForm};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityAccepted {
    pub id: Uuid,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDetail {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub approved_count: usize,
}

/// GET /api/v1/opportunities
pub async fn handle_list_opportunities(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<OpportunityFilter>,
) -> Result<Json<Vec<Opportunity>>, AppError> {
    let all = state.store.list_opportunities().await?;
    Ok(Json(filter_opportunities(&all, &filter)))
}

/// GET /api/v1/opportunities/locations
pub async fn handle_list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let all = state.store.list_opportunities().await?;
    Ok(Json(unique_locations(&all)))
}

/// POST /api/v1/opportunities
///
/// Returns 202 as soon as the write is issued. The new opportunity shows up
/// on the live opportunity feed once the store confirms it.
pub async fn handle_create_opportunity(
    State(state): State<AppState>,
    AppJson(form): AppJson<OpportunityForm>,
) -> Result<(StatusCode, Json<OpportunityAccepted>), AppError> {
    let new = validate_opportunity(form)?;
    let issued = post_opportunity(state.store.clone(), state.feed.clone(), new).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(OpportunityAccepted {
            id: issued.id,
            state: "in_progress",
        }),
    ))
}

/// GET /api/v1/opportunities/:id
pub async fn handle_get_opportunity(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<OpportunityDetail>, AppError> {
    let opportunity = state
        .store
        .get_opportunity(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;

    let approved_count = state
        .store
        .applications_for_opportunity(id)
        .await?
        .iter()
        .filter(|a| a.status == ApplicationStatus::Approved)
        .count();

    Ok(Json(OpportunityDetail {
        opportunity,
        approved_count,
    }))
}
