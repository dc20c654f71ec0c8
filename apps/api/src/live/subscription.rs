use std::future::Future;

use serde::Serialize;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ChangeFeed, Collection, FeedEvent};
use crate::store::StoreError;

/// Result of a live query. Starts at `Loading`; never an implicit null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryState<T> {
    Loading,
    Data { data: T },
    Error { message: String },
}

impl<T> QueryState<T> {
    #[allow(dead_code)]
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Data { data } => Some(data),
            _ => None,
        }
    }
}

impl<T> From<Result<T, StoreError>> for QueryState<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => QueryState::Data { data },
            Err(e) => QueryState::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Handle to a running live query. Dropping or cancelling it stops the query task.
pub struct Subscription<T> {
    receiver: watch::Receiver<QueryState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> Subscription<T> {
    /// Latest state, marking it as seen.
    pub fn current(&mut self) -> QueryState<T> {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next state. `None` once the query task has stopped.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }

    /// Waits until the state satisfies `predicate`.
    #[allow(dead_code)]
    pub async fn wait_for(
        &mut self,
        predicate: impl Fn(&QueryState<T>) -> bool,
    ) -> Option<QueryState<T>> {
        let mut state = self.current();
        while !predicate(&state) {
            state = self.changed().await?;
        }
        Some(state)
    }

    #[allow(dead_code)]
    pub fn cancel(self) {
        // Drop aborts the task.
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Starts a live query over `collection`. `query` runs once immediately and
/// again after every change to that collection.
pub fn subscribe<T, F, Fut>(feed: &ChangeFeed, collection: Collection, query: F) -> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, StoreError>> + Send,
{
    let (sender, receiver) = watch::channel(QueryState::Loading);
    // Subscribe before the first query so no change slips in between.
    let mut events = feed.subscribe();

    let task = tokio::spawn(async move {
        if sender.send(QueryState::from(query().await)).is_err() {
            return;
        }
        loop {
            match events.recv().await {
                Ok(FeedEvent::Changed { collection: c, .. }) if c == collection => {}
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Live query on {collection:?} lagged by {skipped} events; refreshing");
                }
                Err(RecvError::Closed) => break,
            }
            if sender.send(QueryState::from(query().await)).is_err() {
                debug!("Live query on {collection:?} has no subscribers left");
                break;
            }
        }
    });

    Subscription { receiver, task }
}
