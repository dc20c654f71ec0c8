use std::sync::Arc;

use crate::admin::AdminPolicy;
use crate::describe::DescriptionGenerator;
use crate::live::ChangeFeed;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable store. Postgres in production, in-memory for dev and tests.
    pub store: Arc<dyn Store>,
    /// Every confirmed write is published here for live subscribers.
    pub feed: ChangeFeed,
    pub generator: Arc<dyn DescriptionGenerator>,
    pub admin: AdminPolicy,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(
        store: Arc<crate::store::MemoryStore>,
        generator: Arc<dyn DescriptionGenerator>,
        admin: AdminPolicy,
    ) -> Self {
        Self {
            store,
            feed: ChangeFeed::new(64),
            generator,
            admin,
        }
    }
}
