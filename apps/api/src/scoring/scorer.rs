//! Project Scorer: four 0–100 axes and a weighted overall score.
//!
//! The weights are fixed legacy constants; there is no tuning mechanism.
//! Rounding is `f64::round` (half away from zero).

use crate::models::project::{Project, ProjectScores};
use crate::text::contains_term;

/// Technologies that make a listing relevant to the bot's audience.
pub const TECH_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node",
    "nodejs",
    "next",
    "vue",
    "angular",
    "python",
    "django",
    "flask",
    "fastapi",
    "rust",
    "go",
    "golang",
    "java",
    "php",
    "laravel",
    "ruby",
    "rails",
    "api",
    "graphql",
    "sql",
    "postgres",
    "postgresql",
    "mongodb",
    "redis",
    "aws",
    "docker",
    "kubernetes",
    "flutter",
    "swift",
    "kotlin",
    "android",
    "ios",
    "wordpress",
    "shopify",
];

const TECH_KEYWORD_POINTS: u32 = 10;
const USER_SKILL_POINTS: u32 = 20;

const QUALITY_BASE: u32 = 50;
const PAYMENT_VERIFIED_BONUS: u32 = 10;
const VERIFIED_BONUS: u32 = 10;
const HIGH_RATING_BONUS: u32 = 15;
const BIG_SPENDER_BONUS: u32 = 15;
const HIGH_RATING_THRESHOLD: f64 = 4.0;
const BIG_SPENDER_THRESHOLD: f64 = 1000.0;

const COMPETITION_PENALTY_PER_PROPOSAL: u32 = 2;

const CLIENT_RATING_WEIGHT: f64 = 0.6;
const CLIENT_HIRE_RATE_WEIGHT: f64 = 0.4;

const RELEVANCE_WEIGHT: f64 = 0.4;
const QUALITY_WEIGHT: f64 = 0.25;
const COMPETITION_WEIGHT: f64 = 0.2;
const CLIENT_WEIGHT: f64 = 0.15;

const MAX_SCORE: u32 = 100;

/// Scores a project on every axis for a user with the given skills.
pub fn score_project(project: &Project, user_skills: &[String]) -> ProjectScores {
    let mut scores = ProjectScores {
        relevance: relevance_score(project, user_skills),
        quality: quality_score(project),
        competition: competition_score(project),
        client: client_score(project),
        overall: 0,
    };
    scores.overall = overall_score(&scores);
    scores
}

/// +10 per tech keyword in the title/skills, +20 per user skill the project
/// asks for. Capped at 100.
pub fn relevance_score(project: &Project, user_skills: &[String]) -> u32 {
    let text = format!("{} {}", project.title, project.skills.join(" ")).to_lowercase();
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let keyword_hits = TECH_KEYWORDS
        .iter()
        .filter(|kw| tokens.contains(kw))
        .count() as u32;

    let title = project.title.to_lowercase();
    let skill_hits = user_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| project.skills.iter().any(|p| p == s) || contains_term(&title, s))
        .count() as u32;

    (keyword_hits * TECH_KEYWORD_POINTS + skill_hits * USER_SKILL_POINTS).min(MAX_SCORE)
}

/// 50 base plus bonuses for client verification, rating ≥ 4 and spend > 1000.
pub fn quality_score(project: &Project) -> u32 {
    let client = &project.client;
    let mut score = QUALITY_BASE;
    if client.payment_verified {
        score += PAYMENT_VERIFIED_BONUS;
    }
    if client.verified {
        score += VERIFIED_BONUS;
    }
    if client.rating.is_some_and(|r| r >= HIGH_RATING_THRESHOLD) {
        score += HIGH_RATING_BONUS;
    }
    if client.total_spent.is_some_and(|s| s > BIG_SPENDER_THRESHOLD) {
        score += BIG_SPENDER_BONUS;
    }
    score.min(MAX_SCORE)
}

/// 100 − 2·proposals, floored at 0.
pub fn competition_score(project: &Project) -> u32 {
    MAX_SCORE.saturating_sub(project.proposals.count.saturating_mul(COMPETITION_PENALTY_PER_PROPOSAL))
}

/// Rating (scaled to 0–100) and hire rate, weighted 0.6 / 0.4.
/// Missing values contribute nothing.
pub fn client_score(project: &Project) -> u32 {
    let rating = project
        .client
        .rating
        .map(|r| r.clamp(0.0, 5.0) / 5.0 * 100.0)
        .unwrap_or(0.0);
    let hire_rate = project
        .client
        .hire_rate
        .map(|h| h.clamp(0.0, 100.0))
        .unwrap_or(0.0);
    clamp_score(CLIENT_RATING_WEIGHT * rating + CLIENT_HIRE_RATE_WEIGHT * hire_rate)
}

/// 0.4·relevance + 0.25·quality + 0.2·competition + 0.15·client.
pub fn overall_score(scores: &ProjectScores) -> u32 {
    clamp_score(
        RELEVANCE_WEIGHT * scores.relevance as f64
            + QUALITY_WEIGHT * scores.quality as f64
            + COMPETITION_WEIGHT * scores.competition as f64
            + CLIENT_WEIGHT * scores.client as f64,
    )
}

fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, MAX_SCORE as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{ClientInfo, Platform, ProposalCount};

    fn project_with(skills: &[&str], proposals: u32, client: ClientInfo) -> Project {
        let mut project = Project::new(Platform::Upwork, "1", "Web app");
        project.skills = skills.iter().map(|s| s.to_string()).collect();
        project.proposals = ProposalCount { count: proposals };
        project.client = client;
        project
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_react_node_scenario() {
        let project = project_with(
            &["react", "node"],
            3,
            ClientInfo {
                verified: true,
                rating: Some(4.5),
                ..Default::default()
            },
        );
        let scores = score_project(&project, &skills(&["react", "typescript"]));
        assert!(scores.relevance > 0, "relevance was {}", scores.relevance);
        assert_eq!(scores.competition, 94);
        assert!(scores.quality >= 70, "quality was {}", scores.quality);
    }

    #[test]
    fn test_competition_bounds() {
        let fresh = project_with(&[], 0, ClientInfo::default());
        assert_eq!(competition_score(&fresh), 100);
        let crowded = project_with(&[], 50, ClientInfo::default());
        assert_eq!(competition_score(&crowded), 0);
        let swamped = project_with(&[], u32::MAX, ClientInfo::default());
        assert_eq!(competition_score(&swamped), 0);
    }

    #[test]
    fn test_quality_caps_at_100() {
        let project = project_with(
            &[],
            0,
            ClientInfo {
                payment_verified: true,
                verified: true,
                rating: Some(5.0),
                total_spent: Some(50_000.0),
                ..Default::default()
            },
        );
        assert_eq!(quality_score(&project), 100);
    }

    #[test]
    fn test_quality_base_without_signals() {
        let project = project_with(&[], 0, ClientInfo::default());
        assert_eq!(quality_score(&project), 50);
    }

    #[test]
    fn test_relevance_caps_at_100() {
        let project = project_with(
            &[
                "react", "node", "python", "rust", "docker", "aws", "graphql", "sql", "vue",
                "java", "php",
            ],
            0,
            ClientInfo::default(),
        );
        let user = skills(&["react", "node", "python"]);
        assert_eq!(relevance_score(&project, &user), 100);
    }

    #[test]
    fn test_relevance_does_not_match_keyword_inside_word() {
        let mut project = project_with(&[], 0, ClientInfo::default());
        project.title = "Google Sheets cleanup".to_string();
        // "go" must not match inside "google"
        assert_eq!(relevance_score(&project, &[]), 0);
    }

    #[test]
    fn test_user_skill_must_match_whole_word_in_title() {
        let mut project = project_with(&[], 0, ClientInfo::default());
        project.title = "Google Sheets cleanup".to_string();
        assert_eq!(relevance_score(&project, &skills(&["go"])), 0);

        project.title = "Javascript widget".to_string();
        // keyword "javascript" only; "java" is not a separate word
        assert_eq!(relevance_score(&project, &skills(&["java"])), 10);

        project.title = "Small Go service".to_string();
        assert_eq!(relevance_score(&project, &skills(&["go"])), 20 + 10);
    }

    #[test]
    fn test_client_score_weights_rating_and_hire_rate() {
        let project = project_with(
            &[],
            0,
            ClientInfo {
                rating: Some(4.0),
                hire_rate: Some(50.0),
                ..Default::default()
            },
        );
        // 0.6 * 80 + 0.4 * 50 = 68
        assert_eq!(client_score(&project), 68);
    }

    #[test]
    fn test_client_score_clamps_out_of_range_inputs() {
        let project = project_with(
            &[],
            0,
            ClientInfo {
                rating: Some(9.0),
                hire_rate: Some(400.0),
                ..Default::default()
            },
        );
        assert_eq!(client_score(&project), 100);
    }

    #[test]
    fn test_overall_rounds_half_up() {
        // 0.4*1 + 0.25*0 + 0.2*0 + 0.15*1 = 0.55 → 1
        let scores = ProjectScores {
            relevance: 1,
            quality: 0,
            competition: 0,
            client: 1,
            overall: 0,
        };
        assert_eq!(overall_score(&scores), 1);

        // 0.4*5 + 0.25*2 = 2.5 → 3
        let scores = ProjectScores {
            relevance: 5,
            quality: 2,
            competition: 0,
            client: 0,
            overall: 0,
        };
        assert_eq!(overall_score(&scores), 3);
    }

    #[test]
    fn test_overall_always_within_bounds() {
        let extremes = [0u32, 1, 50, 99, 100, u32::MAX];
        for &r in &extremes {
            for &q in &extremes {
                for &c in &extremes {
                    for &cl in &extremes {
                        let scores = ProjectScores {
                            relevance: r,
                            quality: q,
                            competition: c,
                            client: cl,
                            overall: 0,
                        };
                        assert!(overall_score(&scores) <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn test_full_marks_give_100_overall() {
        let scores = ProjectScores {
            relevance: 100,
            quality: 100,
            competition: 100,
            client: 100,
            overall: 0,
        };
        assert_eq!(overall_score(&scores), 100);
    }
}
