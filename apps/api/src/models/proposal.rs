use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    Template,
    Ai,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::Template => "template",
            GenerationMethod::Ai => "ai",
        }
    }
}

/// How a proposal was produced. Returned to callers and stored with the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub method: GenerationMethod,
    pub template_id: Option<String>,
    pub category: String,
    pub model: Option<String>,
    pub generation_ms: u64,
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalQuality {
    pub personalization: u32,
    pub clarity: u32,
    pub length: u32,
    pub call_to_action: u32,
    pub overall: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    Responded,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Responded => "responded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ProposalStatus::Draft),
            "sent" => Some(ProposalStatus::Sent),
            "responded" => Some(ProposalStatus::Responded),
            _ => None,
        }
    }

    /// Lifecycle is strictly draft → sent → responded.
    pub fn transition(self, next: ProposalStatus) -> Result<ProposalStatus, AppError> {
        match (self, next) {
            (ProposalStatus::Draft, ProposalStatus::Sent)
            | (ProposalStatus::Sent, ProposalStatus::Responded) => Ok(next),
            _ => Err(AppError::Validation(format!(
                "Cannot move proposal from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: String,
    pub content: String,
    pub metadata: GenerationMetadata,
    pub quality: ProposalQuality,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_to_sent_to_responded() {
        let sent = ProposalStatus::Draft.transition(ProposalStatus::Sent).unwrap();
        assert_eq!(sent, ProposalStatus::Sent);
        let responded = sent.transition(ProposalStatus::Responded).unwrap();
        assert_eq!(responded, ProposalStatus::Responded);
    }

    #[test]
    fn test_cannot_skip_or_go_backwards() {
        assert!(ProposalStatus::Draft
            .transition(ProposalStatus::Responded)
            .is_err());
        assert!(ProposalStatus::Sent.transition(ProposalStatus::Draft).is_err());
        assert!(ProposalStatus::Responded
            .transition(ProposalStatus::Sent)
            .is_err());
        assert!(ProposalStatus::Draft.transition(ProposalStatus::Draft).is_err());
    }

    #[test]
    fn test_status_parse_matches_as_str() {
        for status in [
            ProposalStatus::Draft,
            ProposalStatus::Sent,
            ProposalStatus::Responded,
        ] {
            assert_eq!(ProposalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProposalStatus::parse("accepted"), None);
    }
}
