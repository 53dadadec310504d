use chrono::{DateTime, Duration, Utc};

use crate::models::project::{Project, ProjectFlags};
use crate::text::contains_term;

const HIGH_VALUE_BUDGET: f64 = 1000.0;
const LOW_COMPETITION_PROPOSALS: u32 = 10;
const URGENT_WINDOW_HOURS: i64 = 72;
const TOP_MATCH_SCORE: u32 = 75;
const URGENT_WORDS: &[&str] = &["urgent", "asap", "immediately", "rush"];

/// Derives display flags from a scored project. `now` is a parameter so the
/// urgency window can be tested deterministically.
pub fn compute_flags(project: &Project, now: DateTime<Utc>) -> ProjectFlags {
    let text = project.search_text();
    let deadline_soon = project
        .deadline
        .is_some_and(|d| d >= now && d - now <= Duration::hours(URGENT_WINDOW_HOURS));

    ProjectFlags {
        high_value: project
            .normalized_budget
            .is_some_and(|b| b >= HIGH_VALUE_BUDGET),
        low_competition: project.proposals.count < LOW_COMPETITION_PROPOSALS,
        urgent: deadline_soon || URGENT_WORDS.iter().any(|w| contains_term(&text, w)),
        verified_client: project.client.payment_verified || project.client.verified,
        top_match: project.scores.overall >= TOP_MATCH_SCORE,
    }
}
