// Proposal Generator.
// Template selection, rule-table variable extraction, AI generation with
// template fallback, post-processing and quality assessment.
// AI calls go through the TextGenerator seam only.

pub mod ai;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod quality;
pub mod templates;
pub mod variables;
