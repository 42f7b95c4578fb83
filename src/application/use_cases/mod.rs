pub mod generate_prompts;
pub mod generate_sql;
pub mod load_catalog;
pub mod process_prompts;
pub mod provision_index;

pub use generate_prompts::{GeneratePromptsUseCase, GenerationOutcome};
pub use generate_sql::GenerateSqlUseCase;
pub use load_catalog::{DatabaseLoad, LoadCatalogUseCase, TableLoad};
pub use process_prompts::{ProcessPromptsUseCase, ProcessingOutcome};
pub use provision_index::ProvisionIndexUseCase;
