use std::sync::Arc;

use crate::application::errors::WorkflowError;
use crate::application::ports::QueryService;
use crate::domain::entities::QueryDraft;

const GENERATE_QUERY_FALLBACK: &str = "Failed to generate query";

pub struct GenerateSqlUseCase {
    query_service: Arc<dyn QueryService>,
}

impl GenerateSqlUseCase {
    pub fn new(query_service: Arc<dyn QueryService>) -> Self {
        Self { query_service }
    }

    /// Replaces the draft's natural-language text with generated SQL.
    /// A blank draft is left alone and yields `None` without a request.
    pub async fn execute(&self, draft: &QueryDraft) -> Result<Option<QueryDraft>, WorkflowError> {
        if draft.is_blank() {
            tracing::debug!("Skipping query generation for blank input");
            return Ok(None);
        }

        match self.query_service.generate_query(draft).await {
            Ok(sql) => Ok(Some(draft.replaced_with(sql))),
            Err(e) => {
                tracing::error!("Error generating query: {}", e);
                Err(WorkflowError::service_with_fallback(e, GENERATE_QUERY_FALLBACK))
            }
        }
    }
}
