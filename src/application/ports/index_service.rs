use async_trait::async_trait;

use crate::application::ports::ServiceError;
use crate::domain::entities::{NewIndexRecord, VectorNamespace};

#[async_trait]
pub trait IndexService: Send + Sync {
    /// Asks for a vector namespace for `database_id`. An existing namespace
    /// comes back as a `409` status error.
    async fn provision_namespace(&self, database_id: i64) -> Result<VectorNamespace, ServiceError>;

    /// Returns the id of the new index record.
    async fn create_index_record(&self, record: &NewIndexRecord) -> Result<i64, ServiceError>;
}
