use std::sync::Arc;

use crate::{
    application::{
        ports::{CatalogService, IndexService, PromptService, QueryService},
        services::IndexBuildWorkflow,
        use_cases::{
            GeneratePromptsUseCase, GenerateSqlUseCase, LoadCatalogUseCase,
            ProcessPromptsUseCase, ProvisionIndexUseCase,
        },
    },
    infrastructure::{
        config::ClientConfig,
        http::{ClientBuildError, MetabaseApiClient},
    },
};

pub struct AppContainer {
    // Remote collaborators
    pub catalog_service: Arc<dyn CatalogService>,
    pub index_service: Arc<dyn IndexService>,
    pub prompt_service: Arc<dyn PromptService>,
    pub query_service: Arc<dyn QueryService>,

    // Use Cases
    pub load_catalog_use_case: Arc<LoadCatalogUseCase>,
    pub provision_index_use_case: Arc<ProvisionIndexUseCase>,
    pub generate_prompts_use_case: Arc<GeneratePromptsUseCase>,
    pub process_prompts_use_case: Arc<ProcessPromptsUseCase>,
    pub generate_sql_use_case: Arc<GenerateSqlUseCase>,

    // Orchestration
    pub index_build_workflow: Arc<IndexBuildWorkflow>,
}

impl AppContainer {
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        tracing::debug!("Connecting to {}", config.base_url);
        let client = Arc::new(MetabaseApiClient::new(config)?);

        Ok(Self::with_services(
            client.clone(),
            client.clone(),
            client.clone(),
            client,
        ))
    }

    pub fn with_services(
        catalog_service: Arc<dyn CatalogService>,
        index_service: Arc<dyn IndexService>,
        prompt_service: Arc<dyn PromptService>,
        query_service: Arc<dyn QueryService>,
    ) -> Self {
        let load_catalog_use_case = Arc::new(LoadCatalogUseCase::new(catalog_service.clone()));
        let provision_index_use_case = Arc::new(ProvisionIndexUseCase::new(index_service.clone()));
        let generate_prompts_use_case = Arc::new(GeneratePromptsUseCase::new(
            catalog_service.clone(),
            prompt_service.clone(),
        ));
        let process_prompts_use_case =
            Arc::new(ProcessPromptsUseCase::new(prompt_service.clone()));
        let generate_sql_use_case = Arc::new(GenerateSqlUseCase::new(query_service.clone()));

        let index_build_workflow = Arc::new(IndexBuildWorkflow::new(
            load_catalog_use_case.clone(),
            provision_index_use_case.clone(),
            generate_prompts_use_case.clone(),
            process_prompts_use_case.clone(),
        ));

        Self {
            catalog_service,
            index_service,
            prompt_service,
            query_service,
            load_catalog_use_case,
            provision_index_use_case,
            generate_prompts_use_case,
            process_prompts_use_case,
            generate_sql_use_case,
            index_build_workflow,
        }
    }
}
