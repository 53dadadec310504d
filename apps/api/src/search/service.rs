//! Search Service: parallel platform search with all-settled semantics.
//!
//! Flow: cache lookup → platform searches (joined) → normalize → score + flags
//!       → budget filter → sort → limit → cache store.
//!
//! A failing platform is reported in `SearchResponse::platforms` and never
//! aborts the search.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::models::project::{Platform, Project};
use crate::platforms::{PlatformClient, SearchParams, SortOrder};
use crate::scoring::flags::compute_flags;
use crate::scoring::normalizer::normalize;
use crate::scoring::scorer::score_project;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStatus {
    pub platform: Platform,
    pub ok: bool,
    pub count: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub projects: Vec<Project>,
    pub platforms: Vec<PlatformStatus>,
    /// Matches before the limit was applied.
    pub total: usize,
    pub cached: bool,
    /// Ids of returned projects that clear the user's notification threshold.
    #[serde(default)]
    pub notify: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

pub struct SearchService {
    clients: Vec<Arc<dyn PlatformClient>>,
    cache: Cache,
    cache_ttl_secs: u64,
}

impl SearchService {
    pub fn new(clients: Vec<Arc<dyn PlatformClient>>, cache: Cache, cache_ttl_secs: u64) -> Self {
        Self {
            clients,
            cache,
            cache_ttl_secs,
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.clients.iter().map(|c| c.platform()).collect()
    }

    /// Searches every enabled platform the params select. Results are scored
    /// against `user_skills`, so the cache key covers both.
    pub async fn search(&self, params: &SearchParams, user_skills: &[String]) -> SearchResponse {
        let key = cache_key(params, user_skills);
        if let Some(mut hit) = self.cache.get_json::<SearchResponse>(&key).await {
            debug!("Search cache hit for {key}");
            hit.cached = true;
            return hit;
        }

        let selected: Vec<&Arc<dyn PlatformClient>> = self
            .clients
            .iter()
            .filter(|c| params.wants(c.platform()))
            .collect();

        let outcomes = join_all(selected.iter().map(|client| async move {
            (client.platform(), client.search(params).await)
        }))
        .await;

        let mut projects = Vec::new();
        let mut statuses = Vec::with_capacity(outcomes.len());
        for (platform, outcome) in outcomes {
            match outcome {
                Ok(listings) => {
                    statuses.push(PlatformStatus {
                        platform,
                        ok: true,
                        count: listings.len(),
                        error: None,
                    });
                    projects.extend(listings.into_iter().map(normalize));
                }
                Err(e) => {
                    warn!("{platform} search failed: {e}");
                    statuses.push(PlatformStatus {
                        platform,
                        ok: false,
                        count: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let now = Utc::now();
        for project in &mut projects {
            project.scores = score_project(project, user_skills);
            project.flags = compute_flags(project, now);
        }

        projects.retain(|p| within_budget(p, params));
        sort_projects(&mut projects, params.sort);

        let total = projects.len();
        projects.truncate(params.effective_limit());

        info!(
            "Search returned {} of {} projects from {} platforms",
            projects.len(),
            total,
            statuses.len()
        );

        let response = SearchResponse {
            projects,
            platforms: statuses,
            total,
            cached: false,
            notify: Vec::new(),
        };

        // Only cache when at least one platform answered.
        if response.platforms.iter().any(|s| s.ok) {
            self.cache
                .set_json(&key, &response, self.cache_ttl_secs)
                .await;
        }

        response
    }
}

/// `search:{sha256}` over the serialized params and lowercased skills.
pub fn cache_key(params: &SearchParams, user_skills: &[String]) -> String {
    let skills: Vec<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
    let payload = serde_json::json!({ "params": params, "skills": skills });
    let digest = Sha256::digest(payload.to_string().as_bytes());
    format!("search:{}", hex::encode(digest))
}

/// Projects without a known budget always pass.
fn within_budget(project: &Project, params: &SearchParams) -> bool {
    let Some(budget) = project.normalized_budget else {
        return true;
    };
    params.min_budget.map_or(true, |min| budget >= min)
        && params.max_budget.map_or(true, |max| budget <= max)
}

/// Stable, descending sort.
fn sort_projects(projects: &mut [Project], order: SortOrder) {
    match order {
        SortOrder::Relevance => {
            projects.sort_by(|a, b| b.scores.overall.cmp(&a.scores.overall))
        }
        SortOrder::Competition => {
            projects.sort_by(|a, b| b.scores.competition.cmp(&a.scores.competition))
        }
        SortOrder::Newest => projects.sort_by(|a, b| b.posted_at.cmp(&a.posted_at)),
        SortOrder::Budget => projects.sort_by(|a, b| {
            match (a.normalized_budget, b.normalized_budget) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::platforms::fiverr::FiverrRequest;
    use crate::platforms::freelancer::FreelancerProject;
    use crate::platforms::{PlatformError, RawListing};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct StubClient {
        platform: Platform,
        listings: Vec<RawListing>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlatformClient for StubClient {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn search(&self, _params: &SearchParams) -> Result<Vec<RawListing>, PlatformError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl PlatformClient for FailingClient {
        fn platform(&self) -> Platform {
            Platform::Upwork
        }

        async fn search(&self, _params: &SearchParams) -> Result<Vec<RawListing>, PlatformError> {
            Err(PlatformError::Api {
                status: 503,
                message: "maintenance".to_string(),
            })
        }
    }

    fn failing() -> Arc<dyn PlatformClient> {
        Arc::new(FailingClient)
    }

    fn freelancer_listing(id: u64, title: &str, max: f64, bids: u32) -> RawListing {
        let raw: FreelancerProject = serde_json::from_value(json!({
            "id": id,
            "title": title,
            "preview_description": "Build it well",
            "budget": { "minimum": max / 2.0, "maximum": max },
            "jobs": [{ "name": "React" }],
            "owner": { "username": "acme", "payment_verified": true },
            "bid_stats": { "bid_count": bids }
        }))
        .unwrap();
        RawListing::Freelancer(raw)
    }

    fn fiverr_listing(id: &str, title: &str) -> RawListing {
        let raw: FiverrRequest = serde_json::from_value(json!({
            "id": id,
            "title": title,
            "tags": ["logo"],
            "buyer": { "username": "bob" }
        }))
        .unwrap();
        RawListing::Fiverr(raw)
    }

    fn counted_stub(
        platform: Platform,
        listings: Vec<RawListing>,
    ) -> (Arc<dyn PlatformClient>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = Arc::new(StubClient {
            platform,
            listings,
            calls: calls.clone(),
        });
        (client, calls)
    }

    fn stub(platform: Platform, listings: Vec<RawListing>) -> Arc<dyn PlatformClient> {
        counted_stub(platform, listings).0
    }

    fn memory_cache() -> Cache {
        Cache::new(Arc::new(MemoryCache::new()))
    }

    #[tokio::test]
    async fn test_failing_platform_does_not_abort_search() {
        let freelancer = stub(
            Platform::Freelancer,
            vec![freelancer_listing(1, "React dashboard", 800.0, 3)],
        );
        let service = SearchService::new(
            vec![failing(), freelancer],
            memory_cache(),
            1800,
        );

        let response = service
            .search(&SearchParams::default(), &["react".to_string()])
            .await;

        assert_eq!(response.projects.len(), 1);
        assert_eq!(response.total, 1);
        assert!(!response.cached);

        let upwork = &response.platforms[0];
        assert_eq!(upwork.platform, Platform::Upwork);
        assert!(!upwork.ok);
        assert!(upwork.error.as_deref().unwrap().contains("maintenance"));

        let freelancer = &response.platforms[1];
        assert!(freelancer.ok);
        assert_eq!(freelancer.count, 1);
    }

    #[tokio::test]
    async fn test_projects_are_scored_and_flagged() {
        let service = SearchService::new(
            vec![stub(
                Platform::Freelancer,
                vec![freelancer_listing(7, "React app", 1500.0, 3)],
            )],
            memory_cache(),
            1800,
        );

        let response = service
            .search(&SearchParams::default(), &["react".to_string()])
            .await;
        let project = &response.projects[0];

        assert_eq!(project.id, "freelancer:7");
        assert_eq!(project.scores.competition, 94);
        assert!(project.scores.relevance > 0);
        assert!(project.flags.high_value);
        assert!(project.flags.low_competition);
        assert!(project.flags.verified_client);
    }

    #[tokio::test]
    async fn test_second_search_is_served_from_cache() {
        let (client, calls) = counted_stub(
            Platform::Freelancer,
            vec![freelancer_listing(1, "React dashboard", 800.0, 3)],
        );
        let service = SearchService::new(vec![client], memory_cache(), 1800);
        let params = SearchParams {
            keywords: vec!["react".to_string()],
            ..Default::default()
        };

        let first = service.search(&params, &[]).await;
        let second = service.search(&params, &[]).await;

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(second.projects, first.projects);
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_platforms_failing_is_not_cached() {
        let service = SearchService::new(vec![failing()], memory_cache(), 1800);

        let first = service.search(&SearchParams::default(), &[]).await;
        let second = service.search(&SearchParams::default(), &[]).await;

        assert!(first.projects.is_empty());
        assert!(!second.cached);
    }

    #[tokio::test]
    async fn test_platform_selection_skips_unselected_clients() {
        let (freelancer, freelancer_calls) = counted_stub(
            Platform::Freelancer,
            vec![freelancer_listing(1, "React dashboard", 800.0, 3)],
        );
        let fiverr = stub(Platform::Fiverr, vec![fiverr_listing("f1", "Logo design")]);
        let service = SearchService::new(vec![freelancer, fiverr], memory_cache(), 1800);

        let params = SearchParams {
            platforms: Some(vec![Platform::Fiverr]),
            ..Default::default()
        };
        let response = service.search(&params, &[]).await;

        assert_eq!(response.platforms.len(), 1);
        assert_eq!(response.projects[0].platform, Platform::Fiverr);
        assert_eq!(freelancer_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_budget_filter_keeps_unknown_budgets() {
        let service = SearchService::new(
            vec![
                stub(
                    Platform::Freelancer,
                    vec![
                        freelancer_listing(1, "Small job", 100.0, 1),
                        freelancer_listing(2, "Big job", 5000.0, 1),
                    ],
                ),
                stub(Platform::Fiverr, vec![fiverr_listing("f1", "No budget here")]),
            ],
            memory_cache(),
            1800,
        );

        let params = SearchParams {
            min_budget: Some(500.0),
            sort: SortOrder::Budget,
            ..Default::default()
        };
        let response = service.search(&params, &[]).await;
        let ids: Vec<&str> = response.projects.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["freelancer:2", "fiverr:f1"]);
    }

    #[tokio::test]
    async fn test_limit_truncates_but_total_counts_all() {
        let listings = (1..=5)
            .map(|i| freelancer_listing(i, "Job", 100.0, 1))
            .collect();
        let service = SearchService::new(
            vec![stub(Platform::Freelancer, listings)],
            memory_cache(),
            1800,
        );

        let params = SearchParams {
            limit: Some(2),
            ..Default::default()
        };
        let response = service.search(&params, &[]).await;

        assert_eq!(response.projects.len(), 2);
        assert_eq!(response.total, 5);
    }

    #[test]
    fn test_sort_newest_and_competition() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut old = Project::new(Platform::Upwork, "old", "Old");
        old.posted_at = Some(base);
        old.scores.competition = 90;
        let mut new = Project::new(Platform::Upwork, "new", "New");
        new.posted_at = Some(base + Duration::hours(5));
        new.scores.competition = 10;
        let undated = Project::new(Platform::Upwork, "undated", "Undated");

        let mut projects = vec![old.clone(), undated.clone(), new.clone()];
        sort_projects(&mut projects, SortOrder::Newest);
        let ids: Vec<&str> = projects.iter().map(|p| p.external_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);

        sort_projects(&mut projects, SortOrder::Competition);
        assert_eq!(projects[0].external_id, "old");
    }

    #[test]
    fn test_cache_key_depends_on_params_and_skills() {
        let params = SearchParams::default();
        let a = cache_key(&params, &["React".to_string()]);
        let b = cache_key(&params, &["react".to_string()]);
        let c = cache_key(&params, &["vue".to_string()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("search:"));
        assert_eq!(a.len(), "search:".len() + 64);
    }
}
