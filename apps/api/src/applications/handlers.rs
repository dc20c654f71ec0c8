//! Axum route handlers for the Application API and the admin surface.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::grouping::{group_by_opportunity, ApplicationGroup, GroupingKey};
use crate::applications::validation::ApplyForm;
use crate::applications::workflow::{
    parse_requested_status, set_application_status, StatusUpdateAccepted,
};
use crate::applications::{apply, find_applications_by_email, StatusLookup};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::{Application, ApplicationStatus};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusLookupRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    #[serde(default)]
    pub group_by: GroupingKey,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(default)]
    pub status: String,
}

/// An application as the admin sees it, with the actions still on offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub actions: Vec<ApplicationStatus>,
}

impl From<Application> for ApplicationView {
    fn from(application: Application) -> Self {
        let actions = application.status.available_actions().to_vec();
        Self {
            application,
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroup {
    pub key: String,
    pub opportunity_title: String,
    pub opportunity_ngo: String,
    pub approved_count: usize,
    pub applications: Vec<ApplicationView>,
}

impl From<ApplicationGroup> for AdminGroup {
    fn from(group: ApplicationGroup) -> Self {
        Self {
            key: group.key,
            opportunity_title: group.opportunity_title,
            opportunity_ngo: group.opportunity_ngo,
            approved_count: group.approved_count,
            applications: group.applications.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn admin_groups(applications: Vec<Application>, key: GroupingKey) -> Vec<AdminGroup> {
    group_by_opportunity(applications, key)
        .into_iter()
        .map(Into::into)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/opportunities/:id/applications
pub async fn handle_list_for_opportunity(
    State(state): State<AppState>,
    AppPath(opportunity_id): AppPath<Uuid>,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications = state
        .store
        .applications_for_opportunity(opportunity_id)
        .await?;
    Ok(Json(applications))
}

/// POST /api/v1/opportunities/:id/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    AppPath(opportunity_id): AppPath<Uuid>,
    AppJson(form): AppJson<ApplyForm>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = apply(state.store.as_ref(), &state.feed, opportunity_id, &form).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// POST /api/v1/applications/lookup
pub async fn handle_lookup(
    State(state): State<AppState>,
    AppJson(request): AppJson<StatusLookupRequest>,
) -> Result<Json<StatusLookup>, AppError> {
    let lookup = find_applications_by_email(state.store.as_ref(), &request.email).await?;
    Ok(Json(lookup))
}

/// GET /api/v1/admin/applications?group_by=opportunity|title
pub async fn handle_admin_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<AdminListQuery>,
) -> Result<Json<Vec<AdminGroup>>, AppError> {
    state.admin.authorize(&headers)?;
    let applications = state.store.list_applications().await?;
    Ok(Json(admin_groups(applications, query.group_by)))
}

/// PATCH /api/v1/admin/applications/:id/status
///
/// Returns 202 once the write is issued; the outcome arrives on the live feed.
pub async fn handle_set_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(application_id): AppPath<Uuid>,
    AppJson(request): AppJson<StatusChangeRequest>,
) -> Result<(StatusCode, Json<StatusUpdateAccepted>), AppError> {
    state.admin.authorize(&headers)?;
    let status = parse_requested_status(&request.status)?;
    let update =
        set_application_status(state.store.clone(), state.feed.clone(), application_id, status)
            .await?;
    // Detached: the client does not wait for confirmation.
    drop(update.handle);
    Ok((StatusCode::ACCEPTED, Json(update.accepted)))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::NewApplication;

    #[test]
    fn test_view_lists_actions_only_for_pending() {
        let mut application = NewApplication {
            volunteer_name: "Jane".to_string(),
            volunteer_email: "jane@x.com".to_string(),
            opportunity_id: Uuid::new_v4(),
            opportunity_title: "Beach".to_string(),
            opportunity_ngo: "Ocean".to_string(),
        }
        .into_application(Uuid::new_v4(), Utc::now());

        let pending = serde_json::to_value(ApplicationView::from(application.clone())).unwrap();
        assert_eq!(pending["actions"], serde_json::json!(["Approved", "Rejected"]));
        assert_eq!(pending["volunteerEmail"], "jane@x.com");

        application.status = ApplicationStatus::Rejected;
        let rejected = serde_json::to_value(ApplicationView::from(application)).unwrap();
        assert_eq!(rejected["actions"], serde_json::json!([]));
    }
}
