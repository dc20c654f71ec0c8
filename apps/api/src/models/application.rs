use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Opportunity;

/// Lifecycle of an application: `Pending` until an admin approves or rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(ApplicationStatus::Pending),
            "Approved" => Some(ApplicationStatus::Approved),
            "Rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    /// Pending may move to either terminal state. Re-applying the current
    /// terminal state is accepted as a no-op; every other move is illegal.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        match (self, next) {
            (ApplicationStatus::Pending, next) => next.is_terminal(),
            (current, next) => *current == next,
        }
    }

    /// Admin actions that may still be offered for an application in this state.
    pub fn available_actions(&self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Pending => &[ApplicationStatus::Approved, ApplicationStatus::Rejected],
            ApplicationStatus::Approved | ApplicationStatus::Rejected => &[],
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volunteer's request to join one opportunity.
///
/// `opportunity_title` and `opportunity_ngo` are copied from the opportunity
/// when the application is created and are never re-synced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub opportunity_id: Uuid,
    pub opportunity_title: String,
    pub opportunity_ngo: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub opportunity_id: Uuid,
    pub opportunity_title: String,
    pub opportunity_ngo: String,
}

impl NewApplication {
    /// Takes the opportunity snapshot. The email is expected to be normalized already.
    pub fn for_opportunity(
        opportunity: &Opportunity,
        volunteer_name: String,
        volunteer_email: String,
    ) -> Self {
        Self {
            volunteer_name,
            volunteer_email,
            opportunity_id: opportunity.id,
            opportunity_title: opportunity.title.clone(),
            opportunity_ngo: opportunity.ngo.clone(),
        }
    }

    pub fn into_application(self, id: Uuid, applied_date: DateTime<Utc>) -> Application {
        Application {
            id,
            volunteer_name: self.volunteer_name,
            volunteer_email: self.volunteer_email,
            status: ApplicationStatus::Pending,
            applied_date,
            opportunity_id: self.opportunity_id,
            opportunity_title: self.opportunity_title,
            opportunity_ngo: self.opportunity_ngo,
        }
    }
}
