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
pub struct FiverrSearchResponse {
    #[serde(default)]
    pub requests: Vec<FiverrRequest>,
}

/// A buyer request. Budgets are usually free text such as `"$100-$500"`.
#[derive(Debug, Clone, Deserialize)]
pub struct FiverrRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub budget: Value,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub buyer: FiverrBuyer,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offers_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiverrBuyer {
    pub username: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub rating: Option<f64>,
    pub total_spent: Option<f64>,
    pub hire_rate: Option<f64>,
    pub orders: Option<u32>,
}

pub struct FiverrApi {
    client: Client,
    config: PlatformConfig,
    token: String,
}

impl FiverrApi {
    pub fn new(config: PlatformConfig, token: String) -> Result<Self, PlatformError> {
        Ok(Self {
            client: build_http_client()?,
            config,
            token,
        })
    }
}

#[async_trait]
impl PlatformClient for FiverrApi {
    fn platform(&self) -> Platform {
        Platform::Fiverr
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<RawListing>, PlatformError> {
        let mut query: Vec<(&str, String)> = vec![
            ("search", params.keywords.join(" ")),
            ("per_page", params.effective_limit().to_string()),
        ];
        if let Some(category) = &params.category {
            query.push(("category", category.clone()));
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

        let body: FiverrSearchResponse = response.json().await?;
        debug!("Fiverr returned {} buyer requests", body.requests.len());
        Ok(body.requests.into_iter().map(RawListing::Fiverr).collect())
    }
}
