//! In-memory stand-in for every port, shared by the application tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::ports::{
    CatalogService, IndexService, PromptService, QueryService, ServiceError,
};
use crate::domain::entities::{
    Database, DatabaseMetadata, NewIndexRecord, NewPrompt, PromptDocument, QueryDraft, Table,
    TableMetadata, VectorNamespace,
};
use crate::domain::value_objects::PromptStatus;

pub struct FakeApi {
    pub databases: Result<Vec<Database>, ServiceError>,
    pub tables: Result<Vec<Table>, ServiceError>,
    pub metadata: HashMap<i64, DatabaseMetadata>,
    pub table_names: HashMap<i64, String>,
    pub provision: Result<VectorNamespace, ServiceError>,
    pub index_id: Result<i64, ServiceError>,
    pub failing_prompt_tables: HashSet<i64>,
    pub process_outcomes: HashMap<i64, Result<bool, ServiceError>>,
    pub list_prompts_fails: bool,
    pub generated_sql: Result<String, ServiceError>,
    pub prompts: Mutex<Vec<PromptDocument>>,
    pub calls: Mutex<Vec<String>>,
    pub created_records: Mutex<Vec<NewIndexRecord>>,
    /// Signalled once `provision_namespace` is parked on `provision_release`.
    pub provision_started: Arc<Notify>,
    pub provision_release: Option<Arc<Notify>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            databases: Ok(vec![]),
            tables: Ok(vec![]),
            metadata: HashMap::new(),
            table_names: HashMap::new(),
            provision: Ok(VectorNamespace::new("ns")),
            index_id: Ok(1),
            failing_prompt_tables: HashSet::new(),
            process_outcomes: HashMap::new(),
            list_prompts_fails: false,
            generated_sql: Ok("SELECT 1".to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            created_records: Mutex::new(Vec::new()),
            provision_started: Arc::new(Notify::new()),
            provision_release: None,
        }
    }
}

impl FakeApi {
    /// Database 7 "sales" with tables 1 "orders" and 2 "refunds", plus an
    /// unrelated table in database 8.
    pub fn sales() -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            7,
            DatabaseMetadata {
                tables: vec![
                    TableMetadata {
                        id: 1,
                        name: "orders".to_string(),
                        fields: vec![
                            crate::domain::entities::FieldMetadata::new("id", "Integer"),
                            crate::domain::entities::FieldMetadata::new("cust_id", "Integer")
                                .with_foreign_key(9),
                        ],
                        ..Default::default()
                    },
                    TableMetadata {
                        id: 2,
                        name: "refunds".to_string(),
                        fields: vec![crate::domain::entities::FieldMetadata::new(
                            "id", "Integer",
                        )],
                        ..Default::default()
                    },
                ],
            },
        );

        Self {
            databases: Ok(vec![Database::new(7, "sales"), Database::new(8, "hr")]),
            tables: Ok(vec![
                Table::new(1, 7, "orders"),
                Table::new(2, 7, "refunds"),
                Table::new(3, 8, "employees"),
            ]),
            metadata,
            table_names: HashMap::from([(9, "customers".to_string())]),
            provision: Ok(VectorNamespace::new("ns-7")),
            index_id: Ok(42),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl CatalogService for FakeApi {
    async fn list_databases(&self) -> Result<Vec<Database>, ServiceError> {
        self.record("list_databases");
        self.databases.clone()
    }

    async fn list_tables(&self) -> Result<Vec<Table>, ServiceError> {
        self.record("list_tables");
        self.tables.clone()
    }

    async fn database_metadata(&self, database_id: i64) -> Result<DatabaseMetadata, ServiceError> {
        self.record(format!("metadata:{}", database_id));
        Ok(self.metadata.get(&database_id).cloned().unwrap_or_default())
    }

    async fn table_name(&self, table_id: i64) -> Result<String, ServiceError> {
        self.record(format!("table_name:{}", table_id));
        self.table_names.get(&table_id).cloned().ok_or(ServiceError::Status {
            status: 404,
            message: Some("Not found.".to_string()),
        })
    }
}

#[async_trait]
impl IndexService for FakeApi {
    async fn provision_namespace(&self, database_id: i64) -> Result<VectorNamespace, ServiceError> {
        self.record(format!("provision:{}", database_id));
        if let Some(release) = &self.provision_release {
            self.provision_started.notify_one();
            release.notified().await;
        }
        self.provision.clone()
    }

    async fn create_index_record(&self, record: &NewIndexRecord) -> Result<i64, ServiceError> {
        self.record(format!("create_index:{}", record.namespace));
        self.created_records.lock().unwrap().push(record.clone());
        self.index_id.clone()
    }
}

#[async_trait]
impl PromptService for FakeApi {
    async fn create_prompt(&self, prompt: &NewPrompt) -> Result<PromptDocument, ServiceError> {
        self.record(format!("create_prompt:{}", prompt.table_reference));
        if self.failing_prompt_tables.contains(&prompt.table_reference) {
            return Err(ServiceError::Status {
                status: 500,
                message: Some(format!("could not save prompt for {}", prompt.name)),
            });
        }
        let mut prompts = self.prompts.lock().unwrap();
        let document = PromptDocument {
            id: 100 + prompts.len() as i64,
            table_reference: prompt.table_reference,
            name: prompt.name.clone(),
            description: Some(prompt.description.clone()),
            content: prompt.content.clone(),
            status: PromptStatus::Pending,
            index_database_llm_id: Some(prompt.index_database_llm_id),
        };
        prompts.push(document.clone());
        Ok(document)
    }

    async fn list_prompts(&self) -> Result<Vec<PromptDocument>, ServiceError> {
        self.record("list_prompts");
        if self.list_prompts_fails {
            return Err(ServiceError::Transport("connection reset".to_string()));
        }
        Ok(self.prompts.lock().unwrap().clone())
    }

    async fn process_prompt(&self, prompt_id: i64) -> Result<bool, ServiceError> {
        self.record(format!("process:{}", prompt_id));
        self.process_outcomes
            .get(&prompt_id)
            .cloned()
            .unwrap_or(Ok(true))
    }
}

#[async_trait]
impl QueryService for FakeApi {
    async fn generate_query(&self, draft: &QueryDraft) -> Result<String, ServiceError> {
        self.record(format!("generate_query:{}", draft.text));
        self.generated_sql.clone()
    }
}
