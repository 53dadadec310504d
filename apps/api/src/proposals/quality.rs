use crate::models::project::Project;
use crate::models::proposal::ProposalQuality;
use crate::text::contains_term;

const CALL_TO_ACTION_PHRASES: &[&str] = &[
    "call",
    "chat",
    "discuss",
    "let me know",
    "reply",
    "message me",
    "get started",
    "start right away",
];

/// Sub-scores for a finished proposal, each in [0, 100].
pub fn assess_quality(content: &str, project: &Project) -> ProposalQuality {
    let lower = content.to_lowercase();
    let words = content.split_whitespace().count();

    let personalization = personalization_score(&lower, project);
    let clarity = clarity_score(content, words);
    let length = length_score(words);
    let call_to_action = if CALL_TO_ACTION_PHRASES
        .iter()
        .any(|p| contains_term(&lower, p))
    {
        100
    } else {
        0
    };

    let overall = (0.35 * personalization as f64
        + 0.25 * clarity as f64
        + 0.2 * length as f64
        + 0.2 * call_to_action as f64)
        .round()
        .clamp(0.0, 100.0) as u32;

    ProposalQuality {
        personalization,
        clarity,
        length,
        call_to_action,
        overall,
    }
}

/// +40 for naming the project, +15 per mentioned project skill (up to three),
/// +15 for addressing the client by name.
fn personalization_score(lower: &str, project: &Project) -> u32 {
    let mut score = 0;
    let title = project.title.trim().to_lowercase();
    if !title.is_empty() && lower.contains(&title) {
        score += 40;
    }
    let skill_hits = project
        .skills
        .iter()
        .filter(|s| contains_term(lower, s))
        .take(3)
        .count() as u32;
    score += skill_hits * 15;
    if let Some(name) = project
        .client
        .name
        .as_deref()
        .and_then(|n| n.split_whitespace().next())
    {
        if contains_term(lower, &name.to_lowercase()) {
            score += 15;
        }
    }
    score.min(100)
}

/// Shorter average sentences read better.
fn clarity_score(content: &str, words: usize) -> u32 {
    let sentences = content
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    if words == 0 || sentences == 0 {
        return 0;
    }
    match words / sentences {
        0..=20 => 100,
        21..=25 => 80,
        26..=30 => 60,
        _ => 40,
    }
}

/// 150–300 words is the sweet spot for a bid.
fn length_score(words: usize) -> u32 {
    match words {
        0 => 0,
        150..=300 => 100,
        100..=149 | 301..=400 => 75,
        50..=99 | 401..=500 => 50,
        _ => 25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Platform;

    fn project() -> Project {
        let mut p = Project::new(Platform::Upwork, "1", "Inventory dashboard");
        p.skills = vec!["react".to_string(), "postgres".to_string()];
        p.client.name = Some("Lena Fischer".to_string());
        p
    }

    #[test]
    fn test_personalized_proposal_scores_high() {
        let content = "Hi Lena, I can build your inventory dashboard with React and Postgres. \
                       Shall we discuss it on a call?";
        let quality = assess_quality(content, &project());
        assert_eq!(quality.personalization, 85);
        assert_eq!(quality.call_to_action, 100);
        assert_eq!(quality.clarity, 100);
    }

    #[test]
    fn test_generic_proposal_scores_low_personalization() {
        let quality = assess_quality("I am a great developer.", &project());
        assert_eq!(quality.personalization, 0);
        assert_eq!(quality.call_to_action, 0);
    }

    #[test]
    fn test_length_bands() {
        assert_eq!(length_score(0), 0);
        assert_eq!(length_score(10), 25);
        assert_eq!(length_score(120), 75);
        assert_eq!(length_score(200), 100);
        assert_eq!(length_score(450), 50);
        assert_eq!(length_score(900), 25);
    }

    #[test]
    fn test_empty_content_is_all_zero_except_bounds() {
        let quality = assess_quality("", &project());
        assert_eq!(quality.clarity, 0);
        assert_eq!(quality.length, 0);
        assert!(quality.overall <= 100);
    }
}
