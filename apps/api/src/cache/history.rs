use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::Cache;
use crate::models::proposal::GenerationMethod;
use crate::platforms::SearchParams;

pub const SEARCH_HISTORY_CAP: usize = 50;
pub const PROPOSAL_HISTORY_CAP: usize = 100;
const EXCERPT_CHARS: usize = 200;
const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub params: SearchParams,
    pub result_count: usize,
    pub top_project_ids: Vec<String>,
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalHistoryEntry {
    pub proposal_id: Uuid,
    pub project_id: String,
    pub project_title: String,
    pub method: GenerationMethod,
    pub word_count: usize,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
}

impl ProposalHistoryEntry {
    pub fn excerpt_of(content: &str) -> String {
        content.chars().take(EXCERPT_CHARS).collect()
    }
}

/// Per-user history lists kept in the cache, newest first.
///
/// Each push is a read-modify-write of the whole list; concurrent pushes for
/// the same user can drop an entry (last write wins).
#[derive(Clone)]
pub struct HistoryStore {
    cache: Cache,
    ttl_secs: u64,
}

impl HistoryStore {
    pub fn new(cache: Cache, ttl_days: u64) -> Self {
        Self {
            cache,
            ttl_secs: ttl_days.max(1) * SECONDS_PER_DAY,
        }
    }

    pub async fn record_search(&self, user_id: Uuid, entry: SearchHistoryEntry) {
        self.push(&search_key(user_id), entry, SEARCH_HISTORY_CAP)
            .await;
    }

    pub async fn record_proposal(&self, user_id: Uuid, entry: ProposalHistoryEntry) {
        self.push(&proposal_key(user_id), entry, PROPOSAL_HISTORY_CAP)
            .await;
    }

    pub async fn searches(&self, user_id: Uuid) -> Vec<SearchHistoryEntry> {
        self.cache
            .get_json(&search_key(user_id))
            .await
            .unwrap_or_default()
    }

    pub async fn proposals(&self, user_id: Uuid) -> Vec<ProposalHistoryEntry> {
        self.cache
            .get_json(&proposal_key(user_id))
            .await
            .unwrap_or_default()
    }

    async fn push<T>(&self, key: &str, entry: T, cap: usize)
    where
        T: Serialize + DeserializeOwned,
    {
        let mut entries: Vec<T> = self.cache.get_json(key).await.unwrap_or_default();
        entries.insert(0, entry);
        entries.truncate(cap);
        self.cache.set_json(key, &entries, self.ttl_secs).await;
    }
}

fn search_key(user_id: Uuid) -> String {
    format!("history:searches:{user_id}")
}

fn proposal_key(user_id: Uuid) -> String {
    format!("history:proposals:{user_id}")
}
