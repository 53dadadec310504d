// Prompt constants for AI proposal generation.
// Filled with the same `{placeholder}` substitution as proposal templates.

/// System prompt for proposal writing.
pub const PROPOSAL_SYSTEM: &str = "You are an experienced freelancer writing a short, \
    specific bid for a project on a freelance marketplace. \
    Write in the first person, be concrete, and never sound like a template.";

/// Replace: {plain_text_instruction}, {grounding_instruction}, {project_json},
///          {profile_json}, {tone}, {max_length}
pub const PROPOSAL_PROMPT_TEMPLATE: &str = r#"{plain_text_instruction}

{grounding_instruction}

PROJECT (as posted by the client):
{project_json}

FREELANCER PROFILE (source of truth about the freelancer):
{profile_json}

Write a proposal for this project.

RULES:
1. Tone: {tone}
2. At most {max_length} characters
3. Open by addressing the client's actual need, not by introducing yourself
4. Mention only the skills from the profile that matter for this project
5. Suggest a timeline and a next step
6. End with a question that invites a reply"#;

pub const DEFAULT_TONE: &str = "friendly and professional";
