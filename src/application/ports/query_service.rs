use async_trait::async_trait;

use crate::application::ports::ServiceError;
use crate::domain::entities::QueryDraft;

#[async_trait]
pub trait QueryService: Send + Sync {
    /// Turns the draft's natural-language text into SQL.
    async fn generate_query(&self, draft: &QueryDraft) -> Result<String, ServiceError>;
}
