use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{Application, ApplicationStatus, NewApplication, NewOpportunity, Opportunity};

#[derive(Default)]
struct Collections {
    opportunities: Vec<Opportunity>,
    applications: Vec<Application>,
}

/// In-process store. Backs `STORE_BACKEND=memory` and the test suite.
pub struct MemoryStore {
    inner: RwLock<Collections>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates losing the connection to the store.
    #[allow(dead_code)]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

/// Newest-first by `key`; ties keep the most recently inserted first.
fn newest_first<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

#[async_trait]
impl Store for MemoryStore {
    async fn is_available(&self) -> bool {
        self.check().is_ok()
    }

    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, StoreError> {
        self.check()?;
        let guard = self.inner.read().await;
        Ok(newest_first(&guard.opportunities, |o| {
            (o.date.clone(), o.created_at)
        }))
    }

    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, StoreError> {
        self.check()?;
        let guard = self.inner.read().await;
        Ok(guard.opportunities.iter().find(|o| o.id == id).cloned())
    }

    async fn create_opportunity(
        &self,
        id: Uuid,
        new: NewOpportunity,
    ) -> Result<Opportunity, StoreError> {
        self.check()?;
        let opportunity = new.into_opportunity(id, Utc::now());
        let mut guard = self.inner.write().await;
        // Same id overwrites, like a document set.
        guard.opportunities.retain(|o| o.id != id);
        guard.opportunities.push(opportunity.clone());
        Ok(opportunity)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        self.check()?;
        let guard = self.inner.read().await;
        Ok(newest_first(&guard.applications, |a| a.applied_date))
    }

    async fn applications_for_opportunity(
        &self,
        opportunity_id: Uuid,
    ) -> Result<Vec<Application>, StoreError> {
        self.check()?;
        let guard = self.inner.read().await;
        let matching: Vec<Application> = guard
            .applications
            .iter()
            .filter(|a| a.opportunity_id == opportunity_id)
            .cloned()
            .collect();
        Ok(newest_first(&matching, |a| a.applied_date))
    }

    async fn applications_by_email(&self, email: &str) -> Result<Vec<Application>, StoreError> {
        self.check()?;
        let guard = self.inner.read().await;
        let matching: Vec<Application> = guard
            .applications
            .iter()
            .filter(|a| a.volunteer_email == email)
            .cloned()
            .collect();
        Ok(newest_first(&matching, |a| a.applied_date))
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        self.check()?;
        let application = new.into_application(Uuid::new_v4(), Utc::now());
        self.inner
            .write()
            .await
            .applications
            .push(application.clone());
        Ok(application)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        self.check()?;
        let mut guard = self.inner.write().await;
        let application = guard
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound {
                entity: "application",
                id,
            })?;
        if !application.status.can_transition_to(status) {
            return Err(StoreError::IllegalTransition {
                from: application.status,
                to: status,
            });
        }
        application.status = status;
        Ok(application.clone())
    }
}
