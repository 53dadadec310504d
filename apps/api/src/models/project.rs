use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freelance marketplace Bidwell can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Upwork,
    Freelancer,
    Fiverr,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Upwork => "upwork",
            Platform::Freelancer => "freelancer",
            Platform::Fiverr => "fiverr",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    #[default]
    Fixed,
    Hourly,
}

/// Budget as advertised by the platform. Every field is optional: many
/// listings carry no budget at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub kind: BudgetKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub payment_verified: bool,
    #[serde(default)]
    pub verified: bool,
    /// 0.0 – 5.0
    pub rating: Option<f64>,
    pub total_spent: Option<f64>,
    /// 0 – 100 (percent)
    pub hire_rate: Option<f64>,
    pub jobs_posted: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCount {
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScores {
    pub relevance: u32,
    pub quality: u32,
    pub competition: u32,
    pub client: u32,
    pub overall: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFlags {
    pub high_value: bool,
    pub low_competition: bool,
    pub urgent: bool,
    pub verified_client: bool,
    pub top_match: bool,
}

/// A listing from any platform, in the common shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// `"{platform}:{external_id}"`
    pub id: String,
    pub external_id: String,
    pub platform: Platform,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: Option<String>,
    #[serde(default)]
    pub budget: Budget,
    pub normalized_budget: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub client: ClientInfo,
    pub posted_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proposals: ProposalCount,
    #[serde(default)]
    pub scores: ProjectScores,
    #[serde(default)]
    pub flags: ProjectFlags,
}

impl Project {
    pub fn new(platform: Platform, external_id: impl Into<String>, title: impl Into<String>) -> Self {
        let external_id = external_id.into();
        Self {
            id: format!("{platform}:{external_id}"),
            external_id,
            platform,
            title: title.into(),
            description: String::new(),
            url: None,
            budget: Budget::default(),
            normalized_budget: None,
            skills: Vec::new(),
            client: ClientInfo::default(),
            posted_at: None,
            deadline: None,
            proposals: ProposalCount::default(),
            scores: ProjectScores::default(),
            flags: ProjectFlags::default(),
        }
    }

    /// Lowercased title + description, the haystack for keyword rules.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}
