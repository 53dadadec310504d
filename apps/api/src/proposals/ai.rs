//! Text-generation seam. The generator holds an `Option<Arc<dyn TextGenerator>>`;
//! `None` means template-only generation.

use async_trait::async_trait;

use crate::llm_client::{LlmClient, LlmError, MODEL};

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model name recorded in generation metadata.
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn model(&self) -> &str {
        MODEL
    }

    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.complete(prompt, system).await
    }
}
