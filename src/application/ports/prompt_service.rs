use async_trait::async_trait;

use crate::application::ports::ServiceError;
use crate::domain::entities::{NewPrompt, PromptDocument};

#[async_trait]
pub trait PromptService: Send + Sync {
    async fn create_prompt(&self, prompt: &NewPrompt) -> Result<PromptDocument, ServiceError>;

    async fn list_prompts(&self) -> Result<Vec<PromptDocument>, ServiceError>;

    /// Submits one prompt for processing and returns the reported outcome.
    async fn process_prompt(&self, prompt_id: i64) -> Result<bool, ServiceError>;
}
