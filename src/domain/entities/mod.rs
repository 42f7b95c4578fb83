pub mod database;
pub mod index_record;
pub mod prompt_document;
pub mod query_draft;
pub mod table;

pub use database::Database;
pub use index_record::{IndexRecord, NewIndexRecord, VectorNamespace};
pub use prompt_document::{NewPrompt, PromptDocument};
pub use query_draft::QueryDraft;
pub use table::{DatabaseMetadata, FieldMetadata, FieldTarget, Table, TableMetadata};
