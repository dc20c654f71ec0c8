// Opportunity posting, lookup, and filtering.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::live::{ChangeFeed, Collection, Notification};
use crate::models::{NewOpportunity, Opportunity};
use crate::store::{Store, StoreError};

pub mod handlers;
pub mod placeholder;
pub mod search;
pub mod validation;

/// A write that was issued but not awaited.
pub struct IssuedWrite<T> {
    pub id: Uuid,
    pub handle: JoinHandle<Result<T, StoreError>>,
}

/// Posts an opportunity without waiting for the store to confirm.
///
/// Fails up front only when the store is unreachable. A failure of the
/// background write is logged and published as a notification; the caller
/// has already moved on.
pub async fn post_opportunity(
    store: Arc<dyn Store>,
    feed: ChangeFeed,
    new: NewOpportunity,
) -> Result<IssuedWrite<Opportunity>, AppError> {
    if !store.is_available().await {
        return Err(AppError::StoreUnavailable(
            "store unreachable before posting opportunity".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    let handle = tokio::spawn(async move {
        match store.create_opportunity(id, new).await {
            Ok(opportunity) => {
                info!("Opportunity {id} posted: {}", opportunity.title);
                feed.publish_change(Collection::Opportunities, id);
                Ok(opportunity)
            }
            Err(e) => {
                error!("Posting opportunity {id} failed: {e}");
                feed.notify(Notification::CreateOpportunityFailed {
                    opportunity_id: id,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    });

    Ok(IssuedWrite { id, handle })
}
