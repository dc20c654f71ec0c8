//! Client-side style filtering over an already-fetched opportunity list.

use serde::Deserialize;

use crate::models::Opportunity;

/// Sentinel meaning "do not filter on this field".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Deserialize)]
pub struct OpportunityFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default = "all")]
    pub category: String,
    #[serde(default)]
    pub location: String,
}

fn all() -> String {
    ALL.to_string()
}

impl Default for OpportunityFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: all(),
            location: String::new(),
        }
    }
}

impl OpportunityFilter {
    pub fn new(search: &str, category: &str, location: &str) -> Self {
        Self {
            search: search.to_string(),
            category: category.to_string(),
            location: location.to_string(),
        }
    }

    /// Search term matches title OR description (case-insensitive), AND the
    /// category matches unless "all", AND the location matches unless "" or "all".
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = opportunity.title.to_lowercase().contains(&term)
            || opportunity.description.to_lowercase().contains(&term);
        let matches_category =
            self.category == ALL || opportunity.category.as_str() == self.category;
        let matches_location = self.location.is_empty()
            || self.location == ALL
            || opportunity.location == self.location;
        matches_search && matches_category && matches_location
    }
}

pub fn filter_opportunities(all: &[Opportunity], filter: &OpportunityFilter) -> Vec<Opportunity> {
    all.iter().filter(|o| filter.matches(o)).cloned().collect()
}

/// Location selector options: "all" first, then each distinct location in
/// order of first appearance.
pub fn unique_locations(all: &[Opportunity]) -> Vec<String> {
    let mut locations = vec![ALL.to_string()];
    for opportunity in all {
        if !locations.contains(&opportunity.location) {
            locations.push(opportunity.location.clone());
        }
    }
    locations
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Category, NewOpportunity};

    fn opportunity(title: &str, description: &str, category: Category, location: &str) -> Opportunity {
        NewOpportunity {
            title: title.to_string(),
            ngo: "Helpers".to_string(),
            description: description.to_string(),
            long_description: String::new(),
            location: location.to_string(),
            date: "2024-10-26".to_string(),
            time_commitment: "2 hours".to_string(),
            category,
            image_url: String::new(),
            image_hint: String::new(),
        }
        .into_opportunity(Uuid::new_v4(), Utc::now())
    }

    fn fixture() -> Vec<Opportunity> {
        vec![
            opportunity("Beach Cleanup", "Remove litter", Category::Environment, "Miami"),
            opportunity("Reading Buddies", "Read with kids at the library", Category::Education, "Orlando"),
            opportunity("Clinic Helper", "Greet patients", Category::Healthcare, "Miami"),
        ]
    }

    #[test]
    fn test_identity_filter_returns_everything() {
        let all = fixture();
        assert_eq!(filter_opportunities(&all, &OpportunityFilter::new("", "all", "all")), all);
        assert_eq!(filter_opportunities(&all, &OpportunityFilter::default()), all);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let all = fixture();
        let by_title = filter_opportunities(&all, &OpportunityFilter::new("BEACH", "all", ""));
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Beach Cleanup");

        let by_description = filter_opportunities(&all, &OpportunityFilter::new("library", "all", ""));
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].title, "Reading Buddies");
    }

    #[test]
    fn test_predicates_are_combined_with_and() {
        let all = fixture();
        // Title matches the Miami opportunity, location matches only the Orlando one.
        let none = filter_opportunities(&all, &OpportunityFilter::new("beach", "all", "Orlando"));
        assert!(none.is_empty());

        let none = filter_opportunities(&all, &OpportunityFilter::new("beach", "Education", "all"));
        assert!(none.is_empty());

        let one = filter_opportunities(&all, &OpportunityFilter::new("beach", "Environment", "Miami"));
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_category_and_location_are_exact() {
        let all = fixture();
        let miami = filter_opportunities(&all, &OpportunityFilter::new("", "all", "Miami"));
        assert_eq!(miami.len(), 2);
        let lowercase = filter_opportunities(&all, &OpportunityFilter::new("", "all", "miami"));
        assert!(lowercase.is_empty());
        let health = filter_opportunities(&all, &OpportunityFilter::new("", "Healthcare", ""));
        assert_eq!(health.len(), 1);
    }

    #[test]
    fn test_unique_locations_keeps_first_appearance_order() {
        assert_eq!(unique_locations(&fixture()), vec!["all", "Miami", "Orlando"]);
        assert_eq!(unique_locations(&[]), vec!["all"]);
    }

    #[test]
    fn test_filter_query_defaults() {
        let filter: OpportunityFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.category, "all");
        assert!(filter.search.is_empty());
        assert!(filter.location.is_empty());
    }
}
