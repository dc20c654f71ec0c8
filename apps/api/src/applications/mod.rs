// Applications: submitting, looking up by email, grouping, and the status workflow.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::validation::{validate_apply, validate_lookup_email, ApplyForm};
use crate::errors::AppError;
use crate::live::{ChangeFeed, Collection};
use crate::models::{Application, NewApplication};
use crate::store::Store;

pub mod grouping;
pub mod handlers;
pub mod validation;
pub mod workflow;

/// The states a status lookup can be in. The server only ever answers with
/// `Empty` or `Found`; the other two exist for clients tracking a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(dead_code)]
pub enum SearchState {
    NotSearched,
    Loading,
    Empty,
    Found,
}

#[derive(Debug, Serialize)]
pub struct StatusLookup {
    pub state: SearchState,
    pub applications: Vec<Application>,
}

/// Submits an application against an existing opportunity. The write is awaited.
pub async fn apply(
    store: &dyn Store,
    feed: &ChangeFeed,
    opportunity_id: Uuid,
    form: &ApplyForm,
) -> Result<Application, AppError> {
    let applicant = validate_apply(form)?;

    let opportunity = store
        .get_opportunity(opportunity_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {opportunity_id} not found")))?;

    let application = store
        .create_application(NewApplication::for_opportunity(
            &opportunity,
            applicant.name,
            applicant.email,
        ))
        .await?;

    info!(
        "Application {} submitted for \"{}\"",
        application.id, opportunity.title
    );
    feed.publish_change(Collection::Applications, application.id);
    Ok(application)
}

/// Case-insensitive exact-match lookup. No matches is not an error.
pub async fn find_applications_by_email(
    store: &dyn Store,
    email: &str,
) -> Result<StatusLookup, AppError> {
    let email = validate_lookup_email(email)?;
    let applications = store.applications_by_email(&email).await?;
    let state = if applications.is_empty() {
        SearchState::Empty
    } else {
        SearchState::Found
    };
    Ok(StatusLookup {
        state,
        applications,
    })
}
