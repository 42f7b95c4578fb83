use std::sync::Arc;

use crate::application::errors::WorkflowError;
use crate::application::ports::IndexService;
use crate::domain::entities::{IndexRecord, NewIndexRecord, VectorNamespace};

const CREATE_INDEX_FALLBACK: &str = "Failed to create index";

pub struct ProvisionIndexUseCase {
    index_service: Arc<dyn IndexService>,
}

impl ProvisionIndexUseCase {
    pub fn new(index_service: Arc<dyn IndexService>) -> Self {
        Self { index_service }
    }

    /// Ensures a namespace exists. An existing namespace is as good as a new
    /// one, so a conflict resolves to the derived fallback name.
    pub async fn provision_namespace(
        &self,
        database_id: i64,
    ) -> Result<VectorNamespace, WorkflowError> {
        match self.index_service.provision_namespace(database_id).await {
            Ok(namespace) => {
                tracing::info!("Provisioned namespace {} for database {}", namespace, database_id);
                Ok(namespace)
            }
            Err(e) if e.is_conflict() => {
                let namespace = VectorNamespace::fallback_for(database_id);
                tracing::warn!(
                    "Namespace for database {} already exists, assuming {}",
                    database_id,
                    namespace
                );
                Ok(namespace)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create_index_record(
        &self,
        database_id: i64,
        description: &str,
        selected_tables: Vec<i64>,
        namespace: VectorNamespace,
    ) -> Result<IndexRecord, WorkflowError> {
        validate_description(description)?;

        let request = NewIndexRecord {
            database_id,
            description: description.to_string(),
            selected_tables,
            namespace,
        };

        let id = self
            .index_service
            .create_index_record(&request)
            .await
            .map_err(|e| WorkflowError::service_with_fallback(e, CREATE_INDEX_FALLBACK))?;

        tracing::info!("Created index record {} for database {}", id, database_id);
        Ok(request.into_record(id))
    }

    /// Provisioning followed by record creation, in that order.
    pub async fn provision(
        &self,
        database_id: i64,
        description: &str,
        selected_tables: Vec<i64>,
    ) -> Result<IndexRecord, WorkflowError> {
        validate_description(description)?;
        let namespace = self.provision_namespace(database_id).await?;
        self.create_index_record(database_id, description, selected_tables, namespace)
            .await
    }
}

pub fn validate_description(description: &str) -> Result<(), WorkflowError> {
    if description.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "Please enter a description of the database".to_string(),
        ));
    }
    Ok(())
}
