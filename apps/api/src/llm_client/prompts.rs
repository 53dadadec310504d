// Shared prompt fragments. Feature-specific prompts live next to their feature
// (see proposals/prompts.rs).

/// System prompt fragment that enforces plain-text output.
pub const PLAIN_TEXT_SYSTEM: &str = "Respond with the requested text only. \
    Do NOT use markdown formatting or code fences. \
    Do NOT include explanations, headings, or apologies.";

/// Instruction that keeps generated text factual.
pub const GROUNDING_INSTRUCTION: &str = "\
    Only mention skills, experience, and links that appear in the freelancer profile. \
    Do NOT invent past clients, numbers, or credentials. \
    If the profile does not support a claim, leave it out.";
