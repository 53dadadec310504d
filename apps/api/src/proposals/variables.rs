//! Template variables: ordered keyword rule tables instead of if/else chains.
//!
//! Every table is scanned top to bottom; the first rule with a pattern
//! found as a whole word in the (lowercased) project text wins.

use std::collections::HashMap;

use crate::models::profile::FreelancerProfile;
use crate::models::project::{BudgetKind, Project};
use crate::text::contains_term;

/// `patterns` are lowercase words or phrases; `value` is what the rule yields.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub patterns: &'static [&'static str],
    pub value: &'static str,
}

const fn rule(patterns: &'static [&'static str], value: &'static str) -> Rule {
    Rule { patterns, value }
}

pub fn first_match(text: &str, rules: &[Rule]) -> Option<&'static str> {
    rules
        .iter()
        .find(|r| r.patterns.iter().any(|p| contains_term(text, p)))
        .map(|r| r.value)
}

pub fn all_matches(text: &str, rules: &[Rule]) -> Vec<&'static str> {
    rules
        .iter()
        .filter(|r| r.patterns.iter().any(|p| contains_term(text, p)))
        .map(|r| r.value)
        .collect()
}

pub const PROJECT_GOAL_RULES: &[Rule] = &[
    rule(&["redesign", "revamp", "modernize"], "refresh an existing product so it looks and works like it should today"),
    rule(&["fix", "fixes", "fixing", "bug", "bugs", "broken", "error", "errors", "issue", "issues"], "get the current problems fixed quickly and reliably"),
    rule(&["mvp", "prototype", "proof of concept"], "get a working first version in front of users fast"),
    rule(&["e-commerce", "ecommerce", "shop", "store", "checkout"], "sell online through a smooth, trustworthy store"),
    rule(&["dashboard", "admin panel", "analytics", "report", "reports", "reporting"], "see the numbers that matter in one clear dashboard"),
    rule(&["api", "integration", "integrate", "webhook", "webhooks"], "connect your systems through a solid, well-documented integration"),
    rule(&["scraper", "scraping", "scrape", "crawler", "automation", "automate", "bot"], "automate repetitive work and save your team time"),
    rule(&["landing page", "website", "site"], "launch a fast website that turns visitors into customers"),
    rule(&["app", "apps", "mobile"], "ship an app your users will enjoy"),
    rule(&["logo", "brand", "branding"], "build a memorable brand identity"),
];
const DEFAULT_PROJECT_GOAL: &str = "deliver this project on time and to a high standard";

pub const PLATFORM_RULES: &[Rule] = &[
    rule(&["ios", "iphone", "ipad", "swift"], "iOS"),
    rule(&["android", "kotlin"], "Android"),
    rule(&["flutter", "react native", "cross-platform", "cross platform"], "cross-platform mobile"),
    rule(&["web", "website", "web app", "browser", "react", "vue", "angular", "next.js"], "web"),
    rule(&["desktop", "electron", "windows", "macos"], "desktop"),
    rule(&["shopify"], "Shopify"),
    rule(&["wordpress", "woocommerce"], "WordPress"),
];
const DEFAULT_PLATFORMS: &str = "web";

pub const TIMELINE_RULES: &[Rule] = &[
    rule(&["quick", "small fix", "minor", "bug", "bugs", "tweak", "tweaks"], "2-3 days"),
    rule(&["landing page", "logo", "single page"], "3-5 days"),
    rule(&["mvp", "prototype"], "2-3 weeks"),
    rule(&["platform", "marketplace", "saas", "full-stack", "full stack", "e-commerce", "ecommerce"], "4-6 weeks"),
];

pub const APPROACH_RULES: &[Rule] = &[
    rule(&["fix", "bug", "bugs", "broken", "error", "errors"], "reproduce the issue, find the root cause, fix it, and add a test so it stays fixed"),
    rule(&["design", "redesign", "ui", "ux", "figma", "logo"], "start with a short brief and moodboard, share early drafts, then refine based on your feedback"),
    rule(&["api", "integration", "backend"], "agree on the data contract first, build and test each endpoint, then document everything"),
    rule(&["mvp", "prototype"], "cut the scope to the core user journey, ship it in small increments, and demo progress every few days"),
];
const DEFAULT_APPROACH: &str = "clarify requirements, share a short plan, then deliver in small, reviewable milestones";

pub const DELIVERABLE_RULES: &[Rule] = &[
    rule(&["source code", "github", "repository", "repo"], "full source code in your repository"),
    rule(&["design", "figma", "mockup", "mockups", "ui"], "editable design files"),
    rule(&["logo", "brand"], "logo files in all common formats"),
    rule(&["deploy", "deployment", "hosting", "server", "aws"], "a deployed, production-ready build"),
    rule(&["document", "documentation", "docs", "readme"], "clear documentation"),
    rule(&["test", "tests", "testing", "qa"], "automated tests"),
];
const DEFAULT_DELIVERABLES: &str = "working, tested code and a short handover guide";

const GENERIC_CLIENT_NAME: &str = "there";

/// Budget-based fallback when no timeline rule matches.
const BUDGET_TIMELINES: &[(f64, &str)] = &[
    (300.0, "3-5 days"),
    (1000.0, "1-2 weeks"),
    (5000.0, "2-4 weeks"),
];
const LARGE_BUDGET_TIMELINE: &str = "4-8 weeks";
const UNKNOWN_BUDGET_TIMELINE: &str = "1-2 weeks";

/// Bids slightly under the client's stated budget.
const PRICE_FACTOR: f64 = 0.9;

pub fn extract_project_goal(project: &Project) -> String {
    first_match(&project.search_text(), PROJECT_GOAL_RULES)
        .unwrap_or(DEFAULT_PROJECT_GOAL)
        .to_string()
}

pub fn extract_platforms(project: &Project) -> String {
    let text = format!("{} {}", project.search_text(), project.skills.join(" "));
    let found = all_matches(&text, PLATFORM_RULES);
    match found.as_slice() {
        [] => DEFAULT_PLATFORMS.to_string(),
        [only] => only.to_string(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

pub fn estimate_project_time(project: &Project) -> String {
    if let Some(timeline) = first_match(&project.search_text(), TIMELINE_RULES) {
        return timeline.to_string();
    }
    match project.normalized_budget {
        Some(budget) => BUDGET_TIMELINES
            .iter()
            .find(|(limit, _)| budget < *limit)
            .map(|(_, timeline)| *timeline)
            .unwrap_or(LARGE_BUDGET_TIMELINE)
            .to_string(),
        None => UNKNOWN_BUDGET_TIMELINE.to_string(),
    }
}

pub fn extract_approach(project: &Project) -> String {
    first_match(&project.search_text(), APPROACH_RULES)
        .unwrap_or(DEFAULT_APPROACH)
        .to_string()
}

pub fn extract_deliverables(project: &Project) -> String {
    let found = all_matches(&project.search_text(), DELIVERABLE_RULES);
    if found.is_empty() {
        DEFAULT_DELIVERABLES.to_string()
    } else {
        found.join(", ")
    }
}

/// Skills the project asks for that the freelancer has; all project skills
/// when there is no overlap; the freelancer's own skills as a last resort.
pub fn extract_tech_stack(project: &Project, profile: &FreelancerProfile) -> String {
    let own: Vec<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();
    let overlap: Vec<&str> = project
        .skills
        .iter()
        .filter(|s| own.contains(s))
        .map(String::as_str)
        .collect();

    let chosen: Vec<&str> = if !overlap.is_empty() {
        overlap
    } else if !project.skills.is_empty() {
        project.skills.iter().map(String::as_str).collect()
    } else {
        profile.skills.iter().map(String::as_str).collect()
    };

    if chosen.is_empty() {
        "modern, well-supported tools".to_string()
    } else {
        chosen.into_iter().take(5).collect::<Vec<_>>().join(", ")
    }
}

pub fn suggest_price(project: &Project, profile: &FreelancerProfile) -> String {
    if project.budget.kind == BudgetKind::Hourly {
        if let Some(rate) = profile.hourly_rate.or(project.normalized_budget) {
            return format!("${}/hr", rate.round());
        }
    }
    match (project.normalized_budget, profile.hourly_rate) {
        (Some(budget), _) => format!("${}", (budget * PRICE_FACTOR).round()),
        (None, Some(rate)) => format!("${}/hr", rate.round()),
        (None, None) => "a fixed price once we agree on the scope".to_string(),
    }
}

pub fn client_greeting(project: &Project) -> String {
    project
        .client
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| n.split_whitespace().next().unwrap_or(n).to_string())
        .unwrap_or_else(|| GENERIC_CLIENT_NAME.to_string())
}

pub fn relevant_experience(project: &Project, profile: &FreelancerProfile) -> String {
    let stack = extract_tech_stack(project, profile);
    match profile.experience_years {
        Some(years) if years > 0 => format!(
            "Over the last {years} years I have delivered similar projects using {stack}, so I know where the tricky parts usually are."
        ),
        _ => format!("I have hands-on experience with {stack} on projects very close to this one."),
    }
}

/// Builds the full variable map used by every proposal template.
pub fn build_variables(project: &Project, profile: &FreelancerProfile) -> HashMap<String, String> {
    let experience_years = profile
        .experience_years
        .map(|y| y.to_string())
        .unwrap_or_else(|| "several".to_string());
    let portfolio = profile
        .portfolio_url
        .clone()
        .unwrap_or_else(|| "available on request".to_string());
    let freelancer_title = profile
        .title
        .clone()
        .unwrap_or_else(|| "a freelance developer".to_string());

    HashMap::from([
        ("client_name".to_string(), client_greeting(project)),
        ("project_title".to_string(), project.title.clone()),
        ("project_goal".to_string(), extract_project_goal(project)),
        ("platforms".to_string(), extract_platforms(project)),
        ("tech_stack".to_string(), extract_tech_stack(project, profile)),
        ("timeline".to_string(), estimate_project_time(project)),
        ("approach".to_string(), extract_approach(project)),
        ("deliverables".to_string(), extract_deliverables(project)),
        ("experience_years".to_string(), experience_years),
        (
            "relevant_experience".to_string(),
            relevant_experience(project, profile),
        ),
        ("portfolio".to_string(), portfolio),
        ("price".to_string(), suggest_price(project, profile)),
        ("freelancer_name".to_string(), profile.name.clone()),
        ("freelancer_title".to_string(), freelancer_title),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Platform;

    fn project(title: &str, description: &str) -> Project {
        let mut p = Project::new(Platform::Upwork, "1", title);
        p.description = description.to_string();
        p
    }

    fn profile() -> FreelancerProfile {
        FreelancerProfile {
            name: "Dana".to_string(),
            title: Some("a full-stack developer".to_string()),
            skills: vec!["React".to_string(), "Node".to_string()],
            experience_years: Some(6),
            portfolio_url: Some("https://dana.dev".to_string()),
            hourly_rate: Some(45.0),
        }
    }

    #[test]
    fn test_first_match_respects_rule_order() {
        // "fix" appears before "website" in the table order
        let p = project("Fix my website", "");
        assert_eq!(
            extract_project_goal(&p),
            "get the current problems fixed quickly and reliably"
        );
    }

    #[test]
    fn test_goal_defaults_when_nothing_matches() {
        let p = project("Translate a document", "Spanish to German");
        assert_eq!(extract_project_goal(&p), DEFAULT_PROJECT_GOAL);
    }

    #[test]
    fn test_platforms_joined_naturally() {
        let p = project("Flutter app for iOS and Android", "");
        assert_eq!(
            extract_platforms(&p),
            "iOS, Android and cross-platform mobile"
        );
        let p = project("Translate a document", "");
        assert_eq!(extract_platforms(&p), "web");
    }

    #[test]
    fn test_timeline_rule_beats_budget() {
        let mut p = project("Quick CSS tweak", "");
        p.normalized_budget = Some(10_000.0);
        assert_eq!(estimate_project_time(&p), "2-3 days");
    }

    #[test]
    fn test_timeline_from_budget_bands() {
        let mut p = project("Data pipeline", "");
        p.normalized_budget = Some(200.0);
        assert_eq!(estimate_project_time(&p), "3-5 days");
        p.normalized_budget = Some(1000.0);
        assert_eq!(estimate_project_time(&p), "2-4 weeks");
        p.normalized_budget = Some(20_000.0);
        assert_eq!(estimate_project_time(&p), LARGE_BUDGET_TIMELINE);
        p.normalized_budget = None;
        assert_eq!(estimate_project_time(&p), UNKNOWN_BUDGET_TIMELINE);
    }

    #[test]
    fn test_deliverables_collects_every_match() {
        let p = project("Deploy API", "Need docs and tests, push to our GitHub repo");
        assert_eq!(
            extract_deliverables(&p),
            "full source code in your repository, a deployed, production-ready build, clear documentation, automated tests"
        );
    }

    #[test]
    fn test_tech_stack_prefers_overlap() {
        let mut p = project("Dashboard", "");
        p.skills = vec!["react".to_string(), "python".to_string()];
        assert_eq!(extract_tech_stack(&p, &profile()), "react");

        p.skills = vec!["python".to_string()];
        assert_eq!(extract_tech_stack(&p, &profile()), "python");

        p.skills.clear();
        assert_eq!(extract_tech_stack(&p, &profile()), "React, Node");
    }

    #[test]
    fn test_price_suggestions() {
        let mut p = project("Site", "");
        p.normalized_budget = Some(500.0);
        assert_eq!(suggest_price(&p, &profile()), "$450");

        p.budget.kind = BudgetKind::Hourly;
        assert_eq!(suggest_price(&p, &profile()), "$45/hr");

        p.budget.kind = BudgetKind::Fixed;
        p.normalized_budget = None;
        let no_rate = FreelancerProfile::default();
        assert_eq!(
            suggest_price(&p, &no_rate),
            "a fixed price once we agree on the scope"
        );
    }

    #[test]
    fn test_client_greeting_uses_first_name() {
        let mut p = project("Site", "");
        assert_eq!(client_greeting(&p), "there");
        p.client.name = Some("  Maria Lopez ".to_string());
        assert_eq!(client_greeting(&p), "Maria");
    }

    #[test]
    fn test_build_variables_covers_every_placeholder() {
        let vars = build_variables(&project("React dashboard", ""), &profile());
        for key in [
            "client_name",
            "project_title",
            "project_goal",
            "platforms",
            "tech_stack",
            "timeline",
            "approach",
            "deliverables",
            "experience_years",
            "relevant_experience",
            "portfolio",
            "price",
            "freelancer_name",
            "freelancer_title",
        ] {
            assert!(vars.contains_key(key), "missing {key}");
        }
        assert_eq!(vars["experience_years"], "6");
        assert_eq!(vars["portfolio"], "https://dana.dev");
    }
}
