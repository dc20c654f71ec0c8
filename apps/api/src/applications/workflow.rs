//! Status workflow: Pending -> Approved | Rejected, triggered by an admin.
//!
//! The status write is fire-and-forget. The caller gets an acknowledgement as
//! soon as the write is issued and observes the result through the live
//! application feed. A failed write leaves the record untouched and is
//! reported as a `Notification` on the same feed.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::live::{ChangeFeed, Collection, Notification};
use crate::models::{Application, ApplicationStatus};
use crate::store::{Store, StoreError};
use crate::validation::ValidationReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateAccepted {
    pub application_id: Uuid,
    pub requested_status: ApplicationStatus,
    pub state: &'static str,
}

pub struct StatusUpdate {
    pub accepted: StatusUpdateAccepted,
    pub handle: JoinHandle<Result<Application, StoreError>>,
}

/// Parses the requested status. Only terminal states may be requested.
pub fn parse_requested_status(raw: &str) -> Result<ApplicationStatus, ValidationReport> {
    match ApplicationStatus::parse(raw.trim()) {
        Some(status) if status.is_terminal() => Ok(status),
        _ => Err(ValidationReport::single(
            "status",
            "Status must be Approved or Rejected.",
        )),
    }
}

/// Issues the status write in the background and returns immediately.
pub async fn set_application_status(
    store: Arc<dyn Store>,
    feed: ChangeFeed,
    application_id: Uuid,
    new_status: ApplicationStatus,
) -> Result<StatusUpdate, AppError> {
    if !new_status.is_terminal() {
        return Err(ValidationReport::single("status", "Status must be Approved or Rejected.").into());
    }
    if !store.is_available().await {
        return Err(AppError::StoreUnavailable(format!(
            "store unreachable before updating application {application_id}"
        )));
    }

    let handle = tokio::spawn(apply_status_update(store, feed, application_id, new_status));

    Ok(StatusUpdate {
        accepted: StatusUpdateAccepted {
            application_id,
            requested_status: new_status,
            state: "in_progress",
        },
        handle,
    })
}

/// Performs the conditional write and publishes its outcome.
pub async fn apply_status_update(
    store: Arc<dyn Store>,
    feed: ChangeFeed,
    application_id: Uuid,
    new_status: ApplicationStatus,
) -> Result<Application, StoreError> {
    match store
        .update_application_status(application_id, new_status)
        .await
    {
        Ok(application) => {
            info!("Application {application_id} is now {new_status}");
            feed.publish_change(Collection::Applications, application_id);
            Ok(application)
        }
        Err(e) => {
            warn!("Status update for application {application_id} to {new_status} failed: {e}");
            feed.notify(Notification::StatusUpdateFailed {
                application_id,
                requested_status: new_status,
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::live::{subscribe, FeedEvent, QueryState};
    use crate::models::{Category, NewApplication, NewOpportunity};
    use crate::store::MemoryStore;

    async fn seeded() -> (Arc<MemoryStore>, Application) {
        let store = Arc::new(MemoryStore::new());
        let opportunity = store
            .create_opportunity(
                Uuid::new_v4(),
                NewOpportunity {
                    title: "Beach Cleanup".to_string(),
                    ngo: "Ocean Savers".to_string(),
                    description: "Clean the beach".to_string(),
                    long_description: "Long".to_string(),
                    location: "Miami".to_string(),
                    date: "2024-10-26".to_string(),
                    time_commitment: "4 hours".to_string(),
                    category: Category::Environment,
                    image_url: String::new(),
                    image_hint: String::new(),
                },
            )
            .await
            .unwrap();
        let application = store
            .create_application(NewApplication::for_opportunity(
                &opportunity,
                "Jane".to_string(),
                "jane@x.com".to_string(),
            ))
            .await
            .unwrap();
        (store, application)
    }

    #[test]
    fn test_only_terminal_statuses_can_be_requested() {
        assert_eq!(parse_requested_status("Approved").unwrap(), ApplicationStatus::Approved);
        assert_eq!(parse_requested_status("Rejected").unwrap(), ApplicationStatus::Rejected);
        assert!(parse_requested_status("Pending").is_err());
        assert!(parse_requested_status("approved").is_err());
    }

    #[tokio::test]
    async fn test_approval_observed_through_live_subscription() {
        let (store, application) = seeded().await;
        assert_eq!(application.status, ApplicationStatus::Pending);
        let feed = ChangeFeed::new(16);

        let query_store = store.clone();
        let mut live = subscribe(&feed, Collection::Applications, move || {
            let store = query_store.clone();
            async move { store.list_applications().await }
        });
        let initial = tokio::time::timeout(Duration::from_secs(1), live.wait_for(|s| s.data().is_some()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(initial.data().unwrap()[0].status, ApplicationStatus::Pending);

        let update = set_application_status(
            store.clone(),
            feed.clone(),
            application.id,
            ApplicationStatus::Approved,
        )
        .await
        .unwrap();
        assert_eq!(update.accepted.state, "in_progress");

        let observed = tokio::time::timeout(
            Duration::from_secs(1),
            live.wait_for(|s| {
                s.data()
                    .is_some_and(|apps| apps[0].status == ApplicationStatus::Approved)
            }),
        )
        .await
        .unwrap()
        .unwrap();
        let approved = &observed.data().unwrap()[0];
        assert!(approved.status.available_actions().is_empty());
        live.cancel();
    }

    #[tokio::test]
    async fn test_illegal_transition_notifies_and_leaves_record() {
        let (store, application) = seeded().await;
        let feed = ChangeFeed::new(16);
        store
            .update_application_status(application.id, ApplicationStatus::Approved)
            .await
            .unwrap();
        let mut events = feed.subscribe();

        let update = set_application_status(
            store.clone(),
            feed.clone(),
            application.id,
            ApplicationStatus::Rejected,
        )
        .await
        .unwrap();
        let result = update.handle.await.unwrap();
        assert!(matches!(result, Err(StoreError::IllegalTransition { .. })));

        match events.recv().await.unwrap() {
            FeedEvent::Notification(Notification::StatusUpdateFailed {
                application_id,
                requested_status,
                ..
            }) => {
                assert_eq!(application_id, application.id);
                assert_eq!(requested_status, ApplicationStatus::Rejected);
            }
            other => panic!("unexpected event {other:?}"),
        }
        let stored = store.list_applications().await.unwrap();
        assert_eq!(stored[0].status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_repeat_approval_is_a_no_op() {
        let (store, application) = seeded().await;
        let feed = ChangeFeed::new(16);
        for _ in 0..2 {
            let update = set_application_status(
                store.clone(),
                feed.clone(),
                application.id,
                ApplicationStatus::Approved,
            )
            .await
            .unwrap();
            let written = update.handle.await.unwrap().unwrap();
            assert_eq!(written.status, ApplicationStatus::Approved);
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_without_writing() {
        let (store, application) = seeded().await;
        store.set_available(false);
        let result = set_application_status(
            store.clone(),
            ChangeFeed::new(16),
            application.id,
            ApplicationStatus::Approved,
        )
        .await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));

        store.set_available(true);
        let stored = store.list_applications().await.unwrap();
        assert_eq!(stored[0].status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_request_rejected_before_store() {
        let (store, application) = seeded().await;
        let result = set_application_status(
            store,
            ChangeFeed::new(16),
            application.id,
            ApplicationStatus::Pending,
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidFields(_))));
    }

    #[test]
    fn test_query_state_loading_has_no_data() {
        assert!(QueryState::<Vec<Application>>::Loading.data().is_none());
    }
}
