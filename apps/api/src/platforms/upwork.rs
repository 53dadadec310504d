use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::models::project::Platform;
use crate::platforms::{build_http_client, PlatformClient, PlatformError, RawListing, SearchParams};

#[derive(Debug, Deserialize)]
pub struct UpworkSearchResponse {
    #[serde(default)]
    pub jobs: Vec<UpworkJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpworkJob {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Number, free-form string, or `{amount, currency}` depending on job age.
    #[serde(default)]
    pub budget: Value,
    #[serde(default)]
    pub hourly_budget: Option<UpworkHourlyBudget>,
    #[serde(default)]
    pub skills: Vec<UpworkSkill>,
    #[serde(default)]
    pub client: UpworkClient,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_applicants: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpworkHourlyBudget {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpworkSkill {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpworkClient {
    pub name: Option<String>,
    pub country: Option<String>,
    pub payment_verification_status: Option<String>,
    #[serde(default)]
    pub identity_verified: bool,
    /// Average feedback, 0 – 5.
    pub feedback: Option<f64>,
    pub total_spent: Option<f64>,
    pub hire_rate: Option<f64>,
    pub jobs_posted: Option<u32>,
}

pub struct UpworkApi {
    client: Client,
    config: PlatformConfig,
    token: String,
}

impl UpworkApi {
    pub fn new(config: PlatformConfig, token: String) -> Result<Self, PlatformError> {
        Ok(Self {
            client: build_http_client()?,
            config,
            token,
        })
    }
}

#[async_trait]
impl PlatformClient for UpworkApi {
    fn platform(&self) -> Platform {
        Platform::Upwork
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<RawListing>, PlatformError> {
        let mut query: Vec<(&str, String)> = vec![
            ("q", params.keywords.join(" ")),
            ("paging", format!("0;{}", params.effective_limit())),
        ];
        if let Some(category) = &params.category {
            query.push(("category2", category.clone()));
        }
        if let (Some(min), Some(max)) = (params.min_budget, params.max_budget) {
            query.push(("budget", format!("{min}-{max}")));
        }

        let response = self
            .client
            .get(&self.config.api_url)
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: UpworkSearchResponse = response.json().await?;
        debug!("Upwork returned {} jobs", body.jobs.len());
        Ok(body.jobs.into_iter().map(RawListing::Upwork).collect())
    }
}
