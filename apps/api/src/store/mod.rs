//! Document store for opportunities and applications.
//!
//! `AppState` holds an `Arc<dyn Store>`; the backend is chosen at startup
//! from `STORE_BACKEND`. Every write is a single-document operation and the
//! last write wins.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Application, ApplicationStatus, NewApplication, NewOpportunity, Opportunity};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("cannot move application from {from} to {to}")]
    IllegalTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap reachability probe used before issuing fire-and-forget writes.
    async fn is_available(&self) -> bool;

    /// All opportunities, ordered by `date` descending.
    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, StoreError>;

    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, StoreError>;

    /// `id` is assigned by the caller so it can be returned before the write lands.
    async fn create_opportunity(
        &self,
        id: Uuid,
        new: NewOpportunity,
    ) -> Result<Opportunity, StoreError>;

    /// All applications, ordered by `applied_date` descending.
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError>;

    async fn applications_for_opportunity(
        &self,
        opportunity_id: Uuid,
    ) -> Result<Vec<Application>, StoreError>;

    /// Exact match. Callers pass an already-normalized email.
    async fn applications_by_email(&self, email: &str) -> Result<Vec<Application>, StoreError>;

    async fn create_application(&self, new: NewApplication) -> Result<Application, StoreError>;

    /// Conditional status write: fails with `IllegalTransition` unless the
    /// current status can move to `status`.
    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError>;
}
