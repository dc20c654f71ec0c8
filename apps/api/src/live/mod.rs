//! Live subscriptions.
//!
//! Every confirmed write publishes a `FeedEvent` on the `ChangeFeed`. A
//! `Subscription` re-runs its query whenever its collection changes and
//! exposes the result as an explicit `QueryState`. Writes by one client become
//! visible to every subscriber, including the writer, only through this feed.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::ApplicationStatus;

pub mod handlers;
pub mod subscription;

pub use subscription::{subscribe, QueryState, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Opportunities,
    Applications,
}

/// Outcome of a background write that the caller did not wait for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    StatusUpdateFailed {
        application_id: Uuid,
        requested_status: ApplicationStatus,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateOpportunityFailed { opportunity_id: Uuid, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Changed { collection: Collection, id: Uuid },
    Notification(Notification),
}

/// Broadcast channel shared by all writers and subscribers.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<FeedEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish_change(&self, collection: Collection, id: Uuid) {
        // No receivers is fine: nobody is watching.
        let _ = self.sender.send(FeedEvent::Changed { collection, id });
    }

    pub fn notify(&self, notification: Notification) {
        let _ = self.sender.send(FeedEvent::Notification(notification));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }
}
