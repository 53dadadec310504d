use anyhow::{Context, Result};

const DEFAULT_UPWORK_API_URL: &str = "https://www.upwork.com/api/profiles/v2/search/jobs.json";
const DEFAULT_FREELANCER_API_URL: &str =
    "https://www.freelancer.com/api/projects/0.1/projects/active/";
const DEFAULT_FIVERR_API_URL: &str = "https://api.fiverr.com/v1/buyer_requests";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// When unset, an in-process cache is used instead of Redis.
    pub redis_url: Option<String>,
    /// When unset, proposals are generated from templates only.
    pub anthropic_api_key: Option<String>,
    pub upwork: PlatformConfig,
    pub freelancer: PlatformConfig,
    pub fiverr: PlatformConfig,
    pub templates_dir: Option<String>,
    pub proposal_max_length: usize,
    pub search_cache_ttl_secs: u64,
    pub history_ttl_days: u64,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_url: String,
    pub api_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            upwork: PlatformConfig {
                api_url: optional_env("UPWORK_API_URL")
                    .unwrap_or_else(|| DEFAULT_UPWORK_API_URL.to_string()),
                api_token: optional_env("UPWORK_API_TOKEN"),
            },
            freelancer: PlatformConfig {
                api_url: optional_env("FREELANCER_API_URL")
                    .unwrap_or_else(|| DEFAULT_FREELANCER_API_URL.to_string()),
                api_token: optional_env("FREELANCER_API_TOKEN"),
            },
            fiverr: PlatformConfig {
                api_url: optional_env("FIVERR_API_URL")
                    .unwrap_or_else(|| DEFAULT_FIVERR_API_URL.to_string()),
                api_token: optional_env("FIVERR_API_TOKEN"),
            },
            templates_dir: optional_env("TEMPLATES_DIR"),
            proposal_max_length: parse_env("PROPOSAL_MAX_LENGTH", 2000)?,
            search_cache_ttl_secs: parse_env("SEARCH_CACHE_TTL_SECS", 1800)?,
            history_ttl_days: parse_env("HISTORY_TTL_DAYS", 30)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats empty values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
