use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::WorkflowError;
use crate::application::ports::{CatalogService, PromptService};
use crate::application::services::PromptRenderer;
use crate::application::services::sequential_fold::{ErrorPolicy, fold_sequential};
use crate::domain::entities::{NewPrompt, PromptDocument};
use crate::domain::value_objects::Progress;

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Documents as last reported by the server, or the ones created during
    /// the loop when the re-fetch failed.
    pub documents: Vec<PromptDocument>,
    /// How many tables produced a document before the loop ended.
    pub generated: usize,
    pub progress: Progress,
    /// The error that stopped the loop early.
    pub error: Option<WorkflowError>,
}

pub struct GeneratePromptsUseCase {
    catalog: Arc<dyn CatalogService>,
    prompts: Arc<dyn PromptService>,
    renderer: PromptRenderer,
}

impl GeneratePromptsUseCase {
    pub fn new(catalog: Arc<dyn CatalogService>, prompts: Arc<dyn PromptService>) -> Self {
        Self {
            catalog,
            prompts,
            renderer: PromptRenderer::new(),
        }
    }

    pub async fn generate_prompt(
        &self,
        index_id: i64,
        database_id: i64,
        table_id: i64,
    ) -> Result<PromptDocument, WorkflowError> {
        let metadata = self.catalog.database_metadata(database_id).await?;
        let table = metadata
            .find_table(table_id)
            .ok_or(WorkflowError::NotFound {
                table_id,
                database_id,
            })?;

        let mut target_names = HashMap::new();
        for target in table.foreign_keys().filter_map(|field| field.target_table_id()) {
            if target_names.contains_key(&target) {
                continue;
            }
            let name = self.catalog.table_name(target).await?;
            target_names.insert(target, name);
        }

        let relationships = PromptRenderer::relationships(table, &target_names);
        let rendered = self.renderer.render(table, &relationships);

        let document = self
            .prompts
            .create_prompt(&NewPrompt {
                name: rendered.name,
                description: rendered.description,
                content: rendered.content,
                index_database_llm_id: index_id,
                table_reference: table_id,
            })
            .await?;

        tracing::debug!("Created prompt {} for table {}", document.id, table_id);
        Ok(document)
    }

    /// Generates one document per table, one table at a time. The first
    /// failure ends the loop; documents created before it are kept.
    pub async fn generate_all<P>(
        &self,
        index_id: i64,
        database_id: i64,
        table_ids: Vec<i64>,
        on_progress: P,
    ) -> GenerationOutcome
    where
        P: FnMut(Progress),
    {
        let total = table_ids.len();
        tracing::info!("Generating prompts for {} tables of database {}", total, database_id);

        let outcome = fold_sequential(
            table_ids,
            ErrorPolicy::AbortOnError,
            |table_id| self.generate_prompt(index_id, database_id, table_id),
            on_progress,
        )
        .await;

        let progress = outcome.progress;
        let (created, error) = outcome.into_parts();
        if let Some(e) = &error {
            tracing::error!("Prompt generation stopped after {} of {} tables: {}", created.len(), total, e);
        }

        let generated = created.len();
        let documents = self.refresh(created).await;

        GenerationOutcome {
            documents,
            generated,
            progress,
            error,
        }
    }

    /// Re-reads the prompts created in this run. The server's copy wins; a
    /// prompt missing from the response keeps its local copy.
    pub async fn refresh(&self, created: Vec<PromptDocument>) -> Vec<PromptDocument> {
        let mut remote: HashMap<i64, PromptDocument> = match self.prompts.list_prompts().await {
            Ok(all) => all.into_iter().map(|document| (document.id, document)).collect(),
            Err(e) => {
                tracing::warn!("Could not re-fetch prompts, keeping local list: {}", e);
                return created;
            }
        };

        created
            .into_iter()
            .map(|local| remote.remove(&local.id).unwrap_or(local))
            .collect()
    }
}
