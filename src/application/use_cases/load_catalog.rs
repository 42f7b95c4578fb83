use std::sync::Arc;

use crate::application::ports::{CatalogService, ServiceError};
use crate::domain::entities::{Database, Table};
use crate::domain::value_objects::TableSelection;

/// Databases available for indexing. A failed load degrades to an empty list;
/// `load_error` keeps the cause for callers that want to mention it.
#[derive(Debug, Clone)]
pub struct DatabaseLoad {
    pub databases: Vec<Database>,
    pub load_error: Option<ServiceError>,
}

/// Tables of one database, with every table selected.
#[derive(Debug, Clone)]
pub struct TableLoad {
    pub database_id: i64,
    pub tables: Vec<Table>,
    pub selection: TableSelection,
    pub load_error: Option<ServiceError>,
}

pub struct LoadCatalogUseCase {
    catalog: Arc<dyn CatalogService>,
}

impl LoadCatalogUseCase {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    pub async fn list_databases(&self) -> DatabaseLoad {
        match self.catalog.list_databases().await {
            Ok(databases) => {
                tracing::debug!("Loaded {} databases", databases.len());
                DatabaseLoad {
                    databases,
                    load_error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load databases: {}", e);
                DatabaseLoad {
                    databases: Vec::new(),
                    load_error: Some(e),
                }
            }
        }
    }

    pub async fn list_tables(&self, database_id: i64) -> TableLoad {
        match self.catalog.list_tables().await {
            Ok(all_tables) => {
                let tables: Vec<Table> = all_tables
                    .into_iter()
                    .filter(|table| table.belongs_to(database_id))
                    .collect();
                tracing::debug!("Loaded {} tables for database {}", tables.len(), database_id);
                TableLoad {
                    database_id,
                    selection: TableSelection::all_of(&tables),
                    tables,
                    load_error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load tables for database {}: {}", database_id, e);
                TableLoad {
                    database_id,
                    tables: Vec::new(),
                    selection: TableSelection::empty(),
                    load_error: Some(e),
                }
            }
        }
    }
}
