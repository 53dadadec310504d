use serde::{Deserialize, Serialize};

/// The freelancer bidding on a project. Supplied by the caller on every
/// generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}
