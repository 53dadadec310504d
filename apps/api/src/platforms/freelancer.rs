use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::models::project::Platform;
use crate::platforms::{build_http_client, PlatformClient, PlatformError, RawListing, SearchParams};

#[derive(Debug, Deserialize)]
pub struct FreelancerSearchResponse {
    pub result: FreelancerResult,
}

#[derive(Debug, Deserialize)]
pub struct FreelancerResult {
    #[serde(default)]
    pub projects: Vec<FreelancerProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreelancerProject {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub preview_description: Option<String>,
    #[serde(default)]
    pub seo_url: Option<String>,
    #[serde(default)]
    pub budget: Option<FreelancerBudget>,
    #[serde(default)]
    pub currency: Option<FreelancerCurrency>,
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,
    #[serde(default)]
    pub jobs: Vec<FreelancerJob>,
    #[serde(default)]
    pub owner: FreelancerOwner,
    /// Unix seconds.
    #[serde(default)]
    pub time_submitted: Option<i64>,
    #[serde(default)]
    pub bid_stats: Option<FreelancerBidStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreelancerBudget {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreelancerCurrency {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreelancerJob {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreelancerOwner {
    pub username: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub payment_verified: bool,
    #[serde(default)]
    pub email_verified: bool,
    pub rating: Option<f64>,
    pub total_spent: Option<f64>,
    pub hire_rate: Option<f64>,
    pub jobs_posted: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreelancerBidStats {
    #[serde(default)]
    pub bid_count: u32,
}

pub struct FreelancerApi {
    client: Client,
    config: PlatformConfig,
}

impl FreelancerApi {
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        Ok(Self {
            client: build_http_client()?,
            config,
        })
    }
}

#[async_trait]
impl PlatformClient for FreelancerApi {
    fn platform(&self) -> Platform {
        Platform::Freelancer
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<RawListing>, PlatformError> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.keywords.join(" ")),
            ("limit", params.effective_limit().to_string()),
            ("full_description", "false".to_string()),
            ("job_details", "true".to_string()),
            ("owner_info", "true".to_string()),
        ];
        if let Some(min) = params.min_budget {
            query.push(("min_price", min.to_string()));
        }
        if let Some(max) = params.max_budget {
            query.push(("max_price", max.to_string()));
        }

        let mut request = self.client.get(&self.config.api_url).query(&query);
        if let Some(token) = &self.config.api_token {
            request = request.header("freelancer-oauth-v1", token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: FreelancerSearchResponse = response.json().await?;
        debug!("Freelancer returned {} projects", body.result.projects.len());
        Ok(body
            .result
            .projects
            .into_iter()
            .map(RawListing::Freelancer)
            .collect())
    }
}
