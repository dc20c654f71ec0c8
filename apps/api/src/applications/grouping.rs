//! Read-side grouping of applications for the admin view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Application, ApplicationStatus};

/// What makes two applications belong to the same group.
///
/// `Title` merges distinct opportunities that happen to share a title; it is
/// kept for callers that want the legacy view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingKey {
    #[default]
    Opportunity,
    Title,
}

impl GroupingKey {
    fn key_for(&self, application: &Application) -> String {
        match self {
            GroupingKey::Opportunity => application.opportunity_id.to_string(),
            GroupingKey::Title => application.opportunity_title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGroup {
    pub key: String,
    pub opportunity_title: String,
    /// Taken from the first application in the group.
    pub opportunity_ngo: String,
    pub approved_count: usize,
    pub applications: Vec<Application>,
}

/// Groups in order of first appearance; applications keep their input order.
pub fn group_by_opportunity(
    applications: impl IntoIterator<Item = Application>,
    key: GroupingKey,
) -> Vec<ApplicationGroup> {
    let mut groups: Vec<ApplicationGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for application in applications {
        let group_key = key.key_for(&application);
        let slot = *index.entry(group_key.clone()).or_insert_with(|| {
            groups.push(ApplicationGroup {
                key: group_key,
                opportunity_title: application.opportunity_title.clone(),
                opportunity_ngo: application.opportunity_ngo.clone(),
                approved_count: 0,
                applications: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        if application.status == ApplicationStatus::Approved {
            group.approved_count += 1;
        }
        group.applications.push(application);
    }

    groups
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::NewApplication;

    fn application(opportunity_id: Uuid, title: &str, ngo: &str, email: &str) -> Application {
        NewApplication {
            volunteer_name: "Volunteer".to_string(),
            volunteer_email: email.to_string(),
            opportunity_id,
            opportunity_title: title.to_string(),
            opportunity_ngo: ngo.to_string(),
        }
        .into_application(Uuid::new_v4(), Utc::now())
    }

    fn river_cleanup_pair() -> Vec<Application> {
        vec![
            application(Uuid::new_v4(), "River Cleanup", "Rivers United", "a@x.com"),
            application(Uuid::new_v4(), "River Cleanup", "Green Rivers", "b@x.com"),
        ]
    }

    #[test]
    fn test_title_grouping_merges_same_titles() {
        let groups = group_by_opportunity(river_cleanup_pair(), GroupingKey::Title);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "River Cleanup");
        assert_eq!(groups[0].applications.len(), 2);
        assert_eq!(groups[0].opportunity_ngo, "Rivers United");
    }

    #[test]
    fn test_opportunity_grouping_keeps_them_apart() {
        let groups = group_by_opportunity(river_cleanup_pair(), GroupingKey::Opportunity);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].opportunity_ngo, "Green Rivers");
    }

    #[test]
    fn test_groups_in_first_appearance_order_and_members_in_input_order() {
        let beach = Uuid::new_v4();
        let library = Uuid::new_v4();
        let apps = vec![
            application(library, "Library", "Readers", "1@x.com"),
            application(beach, "Beach", "Ocean", "2@x.com"),
            application(library, "Library", "Readers", "3@x.com"),
        ];
        let groups = group_by_opportunity(apps, GroupingKey::Opportunity);
        assert_eq!(groups[0].opportunity_title, "Library");
        let emails: Vec<_> = groups[0]
            .applications
            .iter()
            .map(|a| a.volunteer_email.as_str())
            .collect();
        assert_eq!(emails, vec!["1@x.com", "3@x.com"]);
        assert_eq!(groups[1].opportunity_title, "Beach");
    }

    #[test]
    fn test_regrouping_flattened_groups_is_idempotent() {
        let shared = Uuid::new_v4();
        let mut apps = river_cleanup_pair();
        apps.push(application(shared, "Food Drive", "Pantry", "c@x.com"));
        apps.push(application(shared, "Food Drive", "Pantry", "d@x.com"));

        for key in [GroupingKey::Opportunity, GroupingKey::Title] {
            let groups = group_by_opportunity(apps.clone(), key);
            let flattened: Vec<Application> = groups
                .iter()
                .flat_map(|g| g.applications.iter().cloned())
                .collect();
            assert_eq!(group_by_opportunity(flattened, key), groups);
        }
    }

    #[test]
    fn test_approved_count() {
        let id = Uuid::new_v4();
        let mut approved = application(id, "Beach", "Ocean", "a@x.com");
        approved.status = ApplicationStatus::Approved;
        let mut rejected = application(id, "Beach", "Ocean", "b@x.com");
        rejected.status = ApplicationStatus::Rejected;
        let pending = application(id, "Beach", "Ocean", "c@x.com");

        let groups = group_by_opportunity(vec![approved, rejected, pending], GroupingKey::Opportunity);
        assert_eq!(groups[0].approved_count, 1);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_by_opportunity(Vec::new(), GroupingKey::Title).is_empty());
    }

    #[test]
    fn test_grouping_key_query_values() {
        let key: GroupingKey = serde_json::from_str(r#""title""#).unwrap();
        assert_eq!(key, GroupingKey::Title);
        assert_eq!(GroupingKey::default(), GroupingKey::Opportunity);
    }
}
