pub mod catalog_service;
pub mod index_service;
pub mod prompt_service;
pub mod query_service;
pub mod service_error;

pub use catalog_service::CatalogService;
pub use index_service::IndexService;
pub use prompt_service::PromptService;
pub use query_service::QueryService;
pub use service_error::ServiceError;
