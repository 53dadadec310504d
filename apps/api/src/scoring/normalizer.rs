//! Project Normalizer: maps each platform's listing shape onto `Project`.
//!
//! Budgets are best-effort: anything that cannot be read as a number becomes
//! `None`, never zero, so scoring sees "no budget signal" rather than a cheap job.

use chrono::DateTime;
use serde_json::{json, Value};

use crate::models::project::{Budget, BudgetKind, ClientInfo, Platform, Project, ProposalCount};
use crate::platforms::fiverr::FiverrRequest;
use crate::platforms::freelancer::FreelancerProject;
use crate::platforms::upwork::UpworkJob;
use crate::platforms::RawListing;

/// Derives a single comparable number from a heterogeneous budget value.
///
/// - number → itself
/// - string → the first run of digits (`"$100-$500"` → 100)
/// - object → its `max` field, else its `amount` field
/// - anything else → `None`
pub fn normalize_budget(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => digit_runs(s).next(),
        Value::Object(map) => ["max", "amount"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_f64)),
        _ => None,
    }
}

pub fn normalize(raw: RawListing) -> Project {
    match raw {
        RawListing::Upwork(job) => normalize_upwork(job),
        RawListing::Freelancer(project) => normalize_freelancer(project),
        RawListing::Fiverr(request) => normalize_fiverr(request),
    }
}

pub fn normalize_upwork(job: UpworkJob) -> Project {
    let url = job
        .url
        .clone()
        .unwrap_or_else(|| format!("https://www.upwork.com/jobs/{}", job.id));
    let mut project = Project::new(Platform::Upwork, job.id, job.title.trim());
    project.description = job.description.unwrap_or_default();
    project.url = Some(url);

    let budget_value = if !job.budget.is_null() {
        Some((job.budget, BudgetKind::Fixed))
    } else {
        job.hourly_budget
            .map(|h| (json!({ "min": h.min, "max": h.max }), BudgetKind::Hourly))
    };
    if let Some((value, kind)) = budget_value {
        project.budget = budget_from_value(&value, kind);
        project.normalized_budget = normalize_budget(&value);
    }

    project.skills = normalize_skills(job.skills.into_iter().map(|s| s.name));
    project.client = ClientInfo {
        name: job.client.name,
        country: job.client.country,
        payment_verified: job
            .client
            .payment_verification_status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("verified"))
            .unwrap_or(false),
        verified: job.client.identity_verified,
        rating: job.client.feedback,
        total_spent: job.client.total_spent,
        hire_rate: job.client.hire_rate,
        jobs_posted: job.client.jobs_posted,
    };
    project.posted_at = job.created_on;
    project.deadline = job.deadline;
    project.proposals = ProposalCount {
        count: job.total_applicants.unwrap_or(0),
    };
    project
}

pub fn normalize_freelancer(raw: FreelancerProject) -> Project {
    let mut project = Project::new(Platform::Freelancer, raw.id.to_string(), raw.title.trim());
    project.description = raw.preview_description.unwrap_or_default();
    project.url = raw
        .seo_url
        .map(|slug| format!("https://www.freelancer.com/projects/{slug}"));

    let kind = match raw.project_type.as_deref() {
        Some("hourly") => BudgetKind::Hourly,
        _ => BudgetKind::Fixed,
    };
    if let Some(budget) = raw.budget {
        // Freelancer says minimum/maximum; the common shape says min/max.
        let value = json!({
            "min": budget.minimum,
            "max": budget.maximum,
            "currency": raw.currency.map(|c| c.code),
        });
        project.budget = budget_from_value(&value, kind);
        project.normalized_budget = normalize_budget(&value);
    }

    project.skills = normalize_skills(raw.jobs.into_iter().map(|j| j.name));
    project.client = ClientInfo {
        name: raw.owner.username,
        country: raw.owner.country,
        payment_verified: raw.owner.payment_verified,
        verified: raw.owner.email_verified,
        rating: raw.owner.rating,
        total_spent: raw.owner.total_spent,
        hire_rate: raw.owner.hire_rate,
        jobs_posted: raw.owner.jobs_posted,
    };
    project.posted_at = raw
        .time_submitted
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    project.proposals = ProposalCount {
        count: raw.bid_stats.map(|b| b.bid_count).unwrap_or(0),
    };
    project
}

pub fn normalize_fiverr(request: FiverrRequest) -> Project {
    let mut project = Project::new(Platform::Fiverr, request.id, request.title.trim());
    project.description = request.description.unwrap_or_default();
    project.url = request.url;
    if !request.budget.is_null() {
        project.budget = budget_from_value(&request.budget, BudgetKind::Fixed);
        project.normalized_budget = normalize_budget(&request.budget);
    }
    project.skills = normalize_skills(request.tags);
    project.client = ClientInfo {
        name: request.buyer.username,
        country: request.buyer.country,
        payment_verified: false,
        verified: request.buyer.verified,
        rating: request.buyer.rating,
        total_spent: request.buyer.total_spent,
        hire_rate: request.buyer.hire_rate,
        jobs_posted: request.buyer.orders,
    };
    project.posted_at = request.created_at;
    project.deadline = request.due_date;
    project.proposals = ProposalCount {
        count: request.offers_count.unwrap_or(0),
    };
    project
}

/// Structured budget for display. Independent of `normalize_budget`, which
/// keeps its own first-match rule for strings.
fn budget_from_value(value: &Value, kind: BudgetKind) -> Budget {
    match value {
        Value::Number(n) => Budget {
            max: n.as_f64(),
            kind,
            ..Default::default()
        },
        Value::String(s) => {
            let runs: Vec<f64> = digit_runs(s).collect();
            Budget {
                min: if runs.len() > 1 { runs.first().copied() } else { None },
                max: runs.last().copied(),
                currency: s.contains('$').then(|| "USD".to_string()),
                kind,
            }
        }
        Value::Object(map) => {
            let number = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k).and_then(Value::as_f64));
            Budget {
                min: number(&["min", "minimum"]),
                max: number(&["max", "maximum", "amount"]),
                currency: ["currency", "currency_code"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(str::to_string),
                kind,
            }
        }
        _ => Budget {
            kind,
            ..Default::default()
        },
    }
}

fn digit_runs(text: &str) -> impl Iterator<Item = f64> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse::<u64>().ok())
        .map(|n| n as f64)
}

/// Lowercases, trims and de-duplicates skills, keeping first-seen order.
fn normalize_skills<I>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for skill in skills {
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() && !out.contains(&skill) {
            out.push(skill);
        }
    }
    out
}
