use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed set of opportunity categories. Serialized as display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Environment,
    Education,
    Healthcare,
    #[serde(rename = "Community Development")]
    CommunityDevelopment,
    #[serde(rename = "Animal Welfare")]
    AnimalWelfare,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Environment,
        Category::Education,
        Category::Healthcare,
        Category::CommunityDevelopment,
        Category::AnimalWelfare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Environment => "Environment",
            Category::Education => "Education",
            Category::Healthcare => "Healthcare",
            Category::CommunityDevelopment => "Community Development",
            Category::AnimalWelfare => "Animal Welfare",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volunteer engagement posted by an NGO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub ngo: String,
    pub description: String,
    pub long_description: String,
    pub location: String,
    /// Free text, e.g. "October 26, 2024".
    pub date: String,
    pub time_commitment: String,
    pub category: Category,
    pub image_url: String,
    pub image_hint: String,
    pub created_at: DateTime<Utc>,
}

/// A validated opportunity awaiting its store write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOpportunity {
    pub title: String,
    pub ngo: String,
    pub description: String,
    pub long_description: String,
    pub location: String,
    pub date: String,
    pub time_commitment: String,
    pub category: Category,
    pub image_url: String,
    pub image_hint: String,
}

impl NewOpportunity {
    pub fn into_opportunity(self, id: Uuid, created_at: DateTime<Utc>) -> Opportunity {
        Opportunity {
            id,
            title: self.title,
            ngo: self.ngo,
            description: self.description,
            long_description: self.long_description,
            location: self.location,
            date: self.date,
            time_commitment: self.time_commitment,
            category: self.category,
            image_url: self.image_url,
            image_hint: self.image_hint,
            created_at,
        }
    }
}
