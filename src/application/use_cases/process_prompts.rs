use std::sync::Arc;

use crate::application::errors::WorkflowError;
use crate::application::ports::{PromptService, ServiceError};
use crate::application::services::sequential_fold::{ErrorPolicy, fold_sequential};
use crate::domain::entities::PromptDocument;
use crate::domain::value_objects::{Progress, PromptStatus};

#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    /// Input documents in input order, each now `completed` or `failed`.
    pub documents: Vec<PromptDocument>,
    pub progress: Progress,
}

impl ProcessingOutcome {
    pub fn processed(&self) -> usize {
        self.progress.done()
    }

    pub fn completed(&self) -> usize {
        self.count(PromptStatus::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(PromptStatus::Failed)
    }

    fn count(&self, status: PromptStatus) -> usize {
        self.documents
            .iter()
            .filter(|document| document.status == status)
            .count()
    }
}

#[derive(Debug)]
struct ProcessFailure {
    document: PromptDocument,
    error: ServiceError,
}

pub struct ProcessPromptsUseCase {
    prompts: Arc<dyn PromptService>,
}

impl ProcessPromptsUseCase {
    pub fn new(prompts: Arc<dyn PromptService>) -> Self {
        Self { prompts }
    }

    /// Submits every document, one at a time. A failing document is marked
    /// `failed` and the loop carries on.
    pub async fn process_all<P>(&self, documents: Vec<PromptDocument>, on_progress: P) -> ProcessingOutcome
    where
        P: FnMut(Progress),
    {
        tracing::info!("Processing {} prompts", documents.len());

        let outcome = fold_sequential(
            documents,
            ErrorPolicy::ContinueOnError,
            |document| self.process_one(document),
            on_progress,
        )
        .await;

        let progress = outcome.progress;
        let documents: Vec<PromptDocument> = outcome
            .results
            .into_iter()
            .map(|result| match result {
                Ok(document) => document,
                Err(failure) => {
                    tracing::warn!("Prompt {} failed to process: {}", failure.document.id, failure.error);
                    failure.document.with_status(PromptStatus::Failed)
                }
            })
            .collect();

        let result = ProcessingOutcome {
            documents,
            progress,
        };
        tracing::info!(
            "Processed {} prompts: {} completed, {} failed",
            result.processed(),
            result.completed(),
            result.failed()
        );
        result
    }

    /// Lists the index's prompts and processes those not yet completed.
    pub async fn process_pending<P>(&self, index_id: i64, on_progress: P) -> Result<ProcessingOutcome, WorkflowError>
    where
        P: FnMut(Progress),
    {
        let pending: Vec<PromptDocument> = self
            .prompts
            .list_prompts()
            .await?
            .into_iter()
            .filter(|document| document.belongs_to_index(index_id) && !document.status.is_completed())
            .collect();

        Ok(self.process_all(pending, on_progress).await)
    }

    async fn process_one(&self, document: PromptDocument) -> Result<PromptDocument, ProcessFailure> {
        match self.prompts.process_prompt(document.id).await {
            Ok(success) => Ok(document.with_status(PromptStatus::from_process_outcome(success))),
            Err(error) => Err(ProcessFailure { document, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeApi;

    fn document(id: i64, status: PromptStatus) -> PromptDocument {
        PromptDocument {
            id,
            table_reference: id,
            name: format!("table_{}", id),
            description: None,
            content: String::new(),
            status,
            index_database_llm_id: Some(42),
        }
    }

    #[tokio::test]
    async fn test_every_document_is_visited_once() {
        let mut api = FakeApi::default();
        api.process_outcomes.insert(2, Ok(false));
        api.process_outcomes
            .insert(3, Err(ServiceError::Transport("timeout".to_string())));
        let api = Arc::new(api);
        let use_case = ProcessPromptsUseCase::new(api.clone());
        let mut seen = Vec::new();

        let outcome = use_case
            .process_all(
                vec![
                    document(1, PromptStatus::Pending),
                    document(2, PromptStatus::Pending),
                    document(3, PromptStatus::Pending),
                    document(4, PromptStatus::Pending),
                ],
                |progress| seen.push(progress.done()),
            )
            .await;

        assert_eq!(api.calls(), vec!["process:1", "process:2", "process:3", "process:4"]);
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(outcome.processed(), 4);
        let statuses: Vec<PromptStatus> = outcome.documents.iter().map(|d| d.status).collect();
        assert_eq!(
            statuses,
            vec![
                PromptStatus::Completed,
                PromptStatus::Failed,
                PromptStatus::Failed,
                PromptStatus::Completed
            ]
        );
        assert!(outcome.documents.iter().all(|d| !d.status.is_pending()));
    }

    #[tokio::test]
    async fn test_process_pending_skips_completed_and_foreign_documents() {
        let api = FakeApi::default();
        {
            let mut prompts = api.prompts.lock().unwrap();
            prompts.push(document(1, PromptStatus::Completed));
            prompts.push(document(2, PromptStatus::Pending));
            prompts.push(document(3, PromptStatus::Failed));
            let mut foreign = document(4, PromptStatus::Pending);
            foreign.index_database_llm_id = Some(7);
            prompts.push(foreign);
            let mut orphan = document(5, PromptStatus::Pending);
            orphan.index_database_llm_id = None;
            prompts.push(orphan);
        }
        let api = Arc::new(api);
        let use_case = ProcessPromptsUseCase::new(api.clone());

        let outcome = use_case.process_pending(42, |_| {}).await.unwrap();

        assert_eq!(outcome.processed(), 2);
        assert_eq!(outcome.completed(), 2);
        assert_eq!(api.calls(), vec!["list_prompts", "process:2", "process:3"]);
    }

    #[tokio::test]
    async fn test_status_follows_reported_outcome_for_completed_input() {
        let mut api = FakeApi::default();
        api.process_outcomes.insert(1, Ok(false));
        api.process_outcomes
            .insert(2, Err(ServiceError::Transport("timeout".to_string())));
        let use_case = ProcessPromptsUseCase::new(Arc::new(api));

        let outcome = use_case
            .process_all(
                vec![
                    document(1, PromptStatus::Completed),
                    document(2, PromptStatus::Completed),
                ],
                |_| {},
            )
            .await;

        assert_eq!(outcome.failed(), 2);
        assert!(outcome.documents.iter().all(|d| d.status == PromptStatus::Failed));
    }

    #[tokio::test]
    async fn test_process_pending_surfaces_listing_failure() {
        let api = Arc::new(FakeApi {
            list_prompts_fails: true,
            ..FakeApi::default()
        });
        let use_case = ProcessPromptsUseCase::new(api);

        let err = use_case.process_pending(42, |_| {}).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Transport(_)));
    }
}
