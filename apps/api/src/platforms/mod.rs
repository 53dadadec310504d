//! Platform clients: one per freelance marketplace.
//!
//! Each client returns its listings in the platform's own shape
//! (`RawListing`); `scoring::normalizer` turns them into `Project`s.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::models::project::Platform;

pub mod fiverr;
pub mod freelancer;
pub mod upwork;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;
const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Newest,
    Budget,
    Competition,
}

/// Parameter bag for a search across platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub min_budget: Option<f64>,
    #[serde(default)]
    pub max_budget: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Restrict the search to these platforms; all enabled ones when absent.
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
}

impl SearchParams {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn wants(&self, platform: Platform) -> bool {
        self.platforms
            .as_ref()
            .map(|selected| selected.contains(&platform))
            .unwrap_or(true)
    }
}

/// A listing exactly as a platform returned it.
#[derive(Debug, Clone)]
pub enum RawListing {
    Upwork(upwork::UpworkJob),
    Freelancer(freelancer::FreelancerProject),
    Fiverr(fiverr::FiverrRequest),
}

#[async_trait]
pub trait PlatformClient: Send + Sync {
    fn platform(&self) -> Platform;

    async fn search(&self, params: &SearchParams) -> Result<Vec<RawListing>, PlatformError>;
}

pub(crate) fn build_http_client() -> Result<Client, PlatformError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(concat!("bidwell/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Builds a client for every platform the configuration enables.
/// Freelancer's public search works without a token; Upwork and Fiverr do not.
pub fn build_platform_clients(config: &Config) -> Result<Vec<Arc<dyn PlatformClient>>, PlatformError> {
    let mut clients: Vec<Arc<dyn PlatformClient>> = Vec::new();

    if let Some(token) = &config.upwork.api_token {
        clients.push(Arc::new(upwork::UpworkApi::new(
            config.upwork.clone(),
            token.clone(),
        )?));
    }

    clients.push(Arc::new(freelancer::FreelancerApi::new(
        config.freelancer.clone(),
    )?));

    if let Some(token) = &config.fiverr.api_token {
        clients.push(Arc::new(fiverr::FiverrApi::new(
            config.fiverr.clone(),
            token.clone(),
        )?));
    }

    info!(
        "Enabled platforms: {}",
        clients
            .iter()
            .map(|c| c.platform().as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_defaults_and_clamps() {
        let mut params = SearchParams::default();
        assert_eq!(params.effective_limit(), DEFAULT_LIMIT);
        params.limit = Some(0);
        assert_eq!(params.effective_limit(), 1);
        params.limit = Some(5000);
        assert_eq!(params.effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_wants_all_platforms_when_unrestricted() {
        let params = SearchParams::default();
        assert!([Platform::Upwork, Platform::Freelancer, Platform::Fiverr]
            .into_iter()
            .all(|p| params.wants(p)));

        let params = SearchParams {
            platforms: Some(vec![Platform::Fiverr]),
            ..Default::default()
        };
        assert!(params.wants(Platform::Fiverr));
        assert!(!params.wants(Platform::Upwork));
    }

    #[test]
    fn test_search_params_deserialize_from_partial_json() {
        let params: SearchParams =
            serde_json::from_str(r#"{"keywords": ["rust"], "sort": "newest"}"#).unwrap();
        assert_eq!(params.sort, SortOrder::Newest);
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_upwork_payload_deserializes() {
        let json = r#"{"jobs": [{
            "id": "~01abc",
            "title": "React developer needed",
            "budget": {"amount": 750, "currency": "USD"},
            "skills": [{"name": "React"}],
            "client": {"payment_verification_status": "VERIFIED", "feedback": 4.8},
            "created_on": "2026-10-01T12:00:00Z",
            "total_applicants": 12
        }]}"#;
        let body: upwork::UpworkSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.jobs.len(), 1);
        assert_eq!(body.jobs[0].skills[0].name, "React");
        assert_eq!(body.jobs[0].total_applicants, Some(12));
    }

    #[test]
    fn test_freelancer_payload_deserializes() {
        let json = r#"{"result": {"projects": [{
            "id": 3901,
            "title": "Flutter app",
            "budget": {"minimum": 250, "maximum": 750},
            "currency": {"code": "USD"},
            "type": "fixed",
            "jobs": [{"name": "Flutter"}],
            "time_submitted": 1790000000,
            "bid_stats": {"bid_count": 31}
        }]}}"#;
        let body: freelancer::FreelancerSearchResponse = serde_json::from_str(json).unwrap();
        let project = &body.result.projects[0];
        assert_eq!(project.id, 3901);
        assert_eq!(project.project_type.as_deref(), Some("fixed"));
        assert_eq!(project.bid_stats.as_ref().map(|b| b.bid_count), Some(31));
    }

    #[test]
    fn test_fiverr_payload_deserializes() {
        let json = r#"{"requests": [{
            "id": "br-1",
            "title": "Need a logo",
            "budget": "$100-$500",
            "tags": ["logo", "branding"],
            "offers_count": 4
        }]}"#;
        let body: fiverr::FiverrSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.requests[0].budget, serde_json::json!("$100-$500"));
        assert!(!body.requests[0].buyer.verified);
    }
}
