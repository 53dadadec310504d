//! Proposal Generator: AI first when available, templates otherwise.
//!
//! Flow: select category → (AI prompt → TextGenerator) or
//!       (select template → build variables → substitute) → post-process →
//!       quality assessment.
//!
//! AI failures never reach the caller; they are logged and the template path
//! runs instead. The only hard failure is an empty template library.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_SYSTEM};
use crate::models::profile::FreelancerProfile;
use crate::models::project::Project;
use crate::models::proposal::{GenerationMetadata, GenerationMethod, ProposalQuality};
use crate::proposals::ai::TextGenerator;
use crate::proposals::prompts::{DEFAULT_TONE, PROPOSAL_PROMPT_TEMPLATE, PROPOSAL_SYSTEM};
use crate::proposals::quality::assess_quality;
use crate::proposals::templates::{
    build_proposal_from_template, select_category, TemplateCategory, TemplateLibrary,
};
use crate::proposals::variables::build_variables;

/// Shortest `max_length` honoured; smaller requests are raised to this.
pub const MIN_PROPOSAL_LENGTH: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub tone: Option<String>,
}

fn default_use_ai() -> bool {
    true
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_ai: true,
            max_length: None,
            tone: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProposal {
    pub content: String,
    pub metadata: GenerationMetadata,
    pub quality: ProposalQuality,
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

pub struct ProposalGenerator {
    templates: TemplateLibrary,
    ai: Option<Arc<dyn TextGenerator>>,
    default_max_length: usize,
}

impl ProposalGenerator {
    pub fn new(
        templates: TemplateLibrary,
        ai: Option<Arc<dyn TextGenerator>>,
        default_max_length: usize,
    ) -> Self {
        Self {
            templates,
            ai,
            default_max_length: default_max_length.max(MIN_PROPOSAL_LENGTH),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Generates a proposal for `project` on behalf of `profile`.
    pub async fn generate_proposal(
        &self,
        project: &Project,
        profile: &FreelancerProfile,
        options: &GenerationOptions,
    ) -> Result<GeneratedProposal, AppError> {
        let started = Instant::now();
        let max_length = options
            .max_length
            .unwrap_or(self.default_max_length)
            .max(MIN_PROPOSAL_LENGTH);
        let category = select_category(project);

        if options.use_ai {
            if let Some(ai) = &self.ai {
                let generated = self
                    .generate_with_ai(ai.as_ref(), project, profile, options, max_length)
                    .await;
                match generated {
                    Some(content) => {
                        info!("AI proposal generated for project {}", project.id);
                        return Ok(finish(
                            content,
                            project,
                            GenerationMethod::Ai,
                            None,
                            category,
                            Some(ai.model().to_string()),
                            started,
                        ));
                    }
                    None => info!(
                        "Falling back to template proposal for project {}",
                        project.id
                    ),
                }
            }
        }

        let template = self.templates.select(category)?;
        let variables = build_variables(project, profile);
        let raw = build_proposal_from_template(&template.body, &variables);
        let content = post_process(&raw, max_length);

        Ok(finish(
            content,
            project,
            GenerationMethod::Template,
            Some(template.id.clone()),
            template.category,
            None,
            started,
        ))
    }

    /// Returns `None` on any AI failure or empty output.
    async fn generate_with_ai(
        &self,
        ai: &dyn TextGenerator,
        project: &Project,
        profile: &FreelancerProfile,
        options: &GenerationOptions,
        max_length: usize,
    ) -> Option<String> {
        let prompt = build_ai_prompt(project, profile, options, max_length);
        match ai.generate(&prompt, PROPOSAL_SYSTEM).await {
            Ok(text) => {
                let content = post_process(&text, max_length);
                if content.is_empty() {
                    warn!("AI returned an empty proposal for project {}", project.id);
                    None
                } else {
                    Some(content)
                }
            }
            Err(e) => {
                warn!("AI proposal generation failed for project {}: {e}", project.id);
                None
            }
        }
    }
}

fn finish(
    content: String,
    project: &Project,
    method: GenerationMethod,
    template_id: Option<String>,
    category: TemplateCategory,
    model: Option<String>,
    started: Instant,
) -> GeneratedProposal {
    let quality = assess_quality(&content, project);
    let metadata = GenerationMetadata {
        method,
        template_id,
        category: category.as_str().to_string(),
        model,
        generation_ms: started.elapsed().as_millis() as u64,
        word_count: content.split_whitespace().count(),
    };
    GeneratedProposal {
        content,
        metadata,
        quality,
    }
}

fn build_ai_prompt(
    project: &Project,
    profile: &FreelancerProfile,
    options: &GenerationOptions,
    max_length: usize,
) -> String {
    let project_json = json!({
        "title": project.title,
        "description": project.description,
        "skills": project.skills,
        "budget": project.budget,
        "platform": project.platform,
        "client_name": project.client.name,
    });
    let profile_json = serde_json::to_value(profile).unwrap_or_default();

    let variables: HashMap<String, String> = [
        ("plain_text_instruction", PLAIN_TEXT_SYSTEM.to_string()),
        ("grounding_instruction", GROUNDING_INSTRUCTION.to_string()),
        ("project_json", project_json.to_string()),
        ("profile_json", profile_json.to_string()),
        (
            "tone",
            options
                .tone
                .clone()
                .unwrap_or_else(|| DEFAULT_TONE.to_string()),
        ),
        ("max_length", max_length.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    build_proposal_from_template(PROPOSAL_PROMPT_TEMPLATE, &variables)
}

// ────────────────────────────────────────────────────────────────────────────
// Post-processing
// ────────────────────────────────────────────────────────────────────────────

/// Trims, collapses blank-line runs, capitalizes line starts and truncates at
/// a sentence boundary so the result is at most `max_length` characters.
pub fn post_process(text: &str, max_length: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in text.trim().lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(capitalize_line(line));
            previous_blank = false;
        }
    }

    truncate_at_sentence(&lines.join("\n"), max_length)
}

fn capitalize_line(line: &str) -> String {
    let indent = line.len() - line.trim_start().len();
    let (lead, rest) = line.split_at(indent);
    if rest.starts_with("http") {
        return line.to_string();
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            format!("{lead}{}{}", first.to_uppercase(), chars.as_str())
        }
        _ => line.to_string(),
    }
}

fn truncate_at_sentence(text: &str, max_length: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_length) else {
        return text.to_string();
    };
    let window = &text[..cut];

    if let Some(end) = window.rfind(['.', '!', '?']) {
        if end > 0 {
            return window[..=end].trim_end().to_string();
        }
    }
    if let Some(space) = window.rfind(char::is_whitespace) {
        if space > 0 {
            return window[..space].trim_end().to_string();
        }
    }
    window.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
