//! Proposal templates: category selection and `{placeholder}` substitution.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::project::Project;
use crate::proposals::variables::{first_match, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Web,
    Mobile,
    Design,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Web => "web",
            TemplateCategory::Mobile => "mobile",
            TemplateCategory::Design => "design",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalTemplate {
    pub id: String,
    pub category: TemplateCategory,
    pub name: String,
    pub body: String,
}

/// Category rules: mobile is checked before design; web is the fallback.
const CATEGORY_RULES: &[Rule] = &[
    Rule {
        patterns: &[
            "mobile",
            "ios",
            "android",
            "iphone",
            "react native",
            "flutter",
            "app store",
            "play store",
            "mobile app",
        ],
        value: "mobile",
    },
    Rule {
        patterns: &[
            "design",
            "designer",
            "ui",
            "ux",
            "figma",
            "logo",
            "photoshop",
            "illustrator",
            "branding",
            "mockup",
            "mockups",
        ],
        value: "design",
    },
];

pub fn select_category(project: &Project) -> TemplateCategory {
    match first_match(&project.search_text(), CATEGORY_RULES) {
        Some("mobile") => TemplateCategory::Mobile,
        Some("design") => TemplateCategory::Design,
        _ => TemplateCategory::Web,
    }
}

/// Ordered set of templates, injected into the generator at construction.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<ProposalTemplate>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<ProposalTemplate>) -> Self {
        Self { templates }
    }

    /// One template per category.
    pub fn builtin() -> Self {
        Self::new(vec![
            ProposalTemplate {
                id: "web-default".to_string(),
                category: TemplateCategory::Web,
                name: "Web development".to_string(),
                body: WEB_TEMPLATE.to_string(),
            },
            ProposalTemplate {
                id: "mobile-default".to_string(),
                category: TemplateCategory::Mobile,
                name: "Mobile development".to_string(),
                body: MOBILE_TEMPLATE.to_string(),
            },
            ProposalTemplate {
                id: "design-default".to_string(),
                category: TemplateCategory::Design,
                name: "Design".to_string(),
                body: DESIGN_TEMPLATE.to_string(),
            },
        ])
    }

    /// Loads every `*.json` file in `dir`, in file-name order. A file holds
    /// either one template or an array of templates. Templates with an empty
    /// body are skipped.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Cannot read templates directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut templates = Vec::new();
        for path in paths {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Cannot read template file {}", path.display()))?;
            let parsed: TemplateFile = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid template file {}", path.display()))?;
            for template in parsed.into_vec() {
                if template.body.trim().is_empty() {
                    warn!("Skipping template '{}' with an empty body", template.id);
                    continue;
                }
                templates.push(template);
            }
        }

        info!("Loaded {} proposal templates from {}", templates.len(), dir.display());
        Ok(Self::new(templates))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// First template of `category`, else the first web template, else the
    /// first template at all.
    pub fn select(&self, category: TemplateCategory) -> Result<&ProposalTemplate, AppError> {
        self.templates
            .iter()
            .find(|t| t.category == category)
            .or_else(|| {
                self.templates
                    .iter()
                    .find(|t| t.category == TemplateCategory::Web)
            })
            .or_else(|| self.templates.first())
            .ok_or(AppError::NoTemplates)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateFile {
    Many(Vec<ProposalTemplate>),
    One(ProposalTemplate),
}

impl TemplateFile {
    fn into_vec(self) -> Vec<ProposalTemplate> {
        match self {
            TemplateFile::Many(templates) => templates,
            TemplateFile::One(template) => vec![template],
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("placeholder pattern should compile")
    })
}

/// Replaces every `{name}` token that has a variable. Unknown tokens are
/// kept as written. Substituted values are never expanded again.
pub fn build_proposal_from_template(body: &str, variables: &HashMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(body, |caps: &Captures| {
            variables
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

const WEB_TEMPLATE: &str = "Hi {client_name},

I read your post \"{project_title}\" and I understand you want to {project_goal}. I'm {freelancer_name}, {freelancer_title} with {experience_years} years of experience building {platforms} projects with {tech_stack}.

{relevant_experience}

My approach: {approach}.

You will get {deliverables}. I estimate {timeline} for the work, and I can do it for {price}.

Portfolio: {portfolio}

Could we have a short call to go over the details? I can start right away.

Best regards,
{freelancer_name}";

const MOBILE_TEMPLATE: &str = "Hi {client_name},

Your project \"{project_title}\" is a great fit for me. You want to {project_goal}, and I build {platforms} apps with {tech_stack} every day.

{relevant_experience}

Here is how I would work: {approach}.

You will get {deliverables}, plus help with the store submission. Timeline: {timeline}. Price: {price}.

Apps I have shipped: {portfolio}

Would you like to discuss the features in a quick chat?

Thanks,
{freelancer_name}";

const DESIGN_TEMPLATE: &str = "Hi {client_name},

I would love to help with \"{project_title}\". You want to {project_goal}, and that is exactly the kind of design work I enjoy.

I'm {freelancer_name}, {freelancer_title} with {experience_years} years of experience. {relevant_experience}

My process: {approach}.

You will receive {deliverables}. I can deliver in {timeline} for {price}.

Recent work: {portfolio}

Let me know when you are free to discuss your vision.

Best,
{freelancer_name}";
