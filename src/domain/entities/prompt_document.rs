use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PromptStatus;

/// Markdown description of one table, stored server-side and fed to the LLM
/// service. Only `status` changes once a document exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDocument {
    pub id: i64,
    pub table_reference: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "prompt")]
    pub content: String,
    #[serde(default)]
    pub status: PromptStatus,
    #[serde(default)]
    pub index_database_llm_id: Option<i64>,
}

impl PromptDocument {
    /// A prompt without an owner belongs to no index.
    pub fn belongs_to_index(&self, index_id: i64) -> bool {
        self.index_database_llm_id == Some(index_id)
    }

    /// Returns a copy carrying `status`; illegal transitions keep the current one.
    pub fn with_status(&self, status: PromptStatus) -> Self {
        let mut next = self.clone();
        if self.status.can_transition_to(&status) {
            next.status = status;
        }
        next
    }
}

/// Body of a create-prompt request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPrompt {
    pub name: String,
    pub description: String,
    #[serde(rename = "prompt")]
    pub content: String,
    pub index_database_llm_id: i64,
    pub table_reference: i64,
}
