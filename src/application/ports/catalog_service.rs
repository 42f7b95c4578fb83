use async_trait::async_trait;

use crate::application::ports::ServiceError;
use crate::domain::entities::{Database, DatabaseMetadata, Table};

/// Database and table metadata owned by the host application.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_databases(&self) -> Result<Vec<Database>, ServiceError>;

    /// Tables of every database; callers filter by `db_id`.
    async fn list_tables(&self) -> Result<Vec<Table>, ServiceError>;

    async fn database_metadata(&self, database_id: i64) -> Result<DatabaseMetadata, ServiceError>;

    async fn table_name(&self, table_id: i64) -> Result<String, ServiceError>;
}
