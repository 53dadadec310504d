use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::project::{Platform, Project};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPreferences {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPreferences {
    pub enabled: bool,
    pub tone: Option<String>,
    pub max_length: Option<usize>,
}

impl Default for AiPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            tone: None,
            max_length: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub enabled: bool,
    /// Only notify about projects whose overall score reaches this value.
    pub min_score: u32,
}

impl NotificationPreferences {
    pub fn should_notify(&self, project: &Project) -> bool {
        self.enabled && project.scores.overall >= self.min_score
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: 70,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub search: SearchPreferences,
    #[serde(default)]
    pub ai: AiPreferences,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageCounters {
    pub searches: u64,
    pub proposals_generated: u64,
    pub ai_generations: u64,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl UsageCounters {
    pub fn record_search(&mut self, at: DateTime<Utc>) {
        self.searches += 1;
        self.last_active_at = Some(at);
    }

    pub fn record_proposal(&mut self, used_ai: bool, at: DateTime<Utc>) {
        self.proposals_generated += 1;
        if used_ai {
            self.ai_generations += 1;
        }
        self.last_active_at = Some(at);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Account id on the bot platform.
    pub external_id: String,
    pub preferences: UserPreferences,
    pub usage: UsageCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
