use serde::{Deserialize, Serialize};

/// Text sitting in the native query editor, plus the context sent along with
/// a natural-language question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDraft {
    pub text: String,
    pub database_id: Option<i64>,
    pub table_ids: Vec<i64>,
    /// Set once generated SQL has replaced the text and should be run.
    #[serde(default)]
    pub run_requested: bool,
}

impl QueryDraft {
    pub fn new(text: impl Into<String>, database_id: Option<i64>, table_ids: Vec<i64>) -> Self {
        Self {
            text: text.into(),
            database_id,
            table_ids,
            run_requested: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn replaced_with(&self, sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            database_id: self.database_id,
            table_ids: self.table_ids.clone(),
            run_requested: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaced_with_keeps_context_and_requests_run() {
        let draft = QueryDraft::new("top customers", Some(7), vec![1, 2]);
        let replaced = draft.replaced_with("SELECT 1");

        assert_eq!(replaced.text, "SELECT 1");
        assert_eq!(replaced.database_id, Some(7));
        assert_eq!(replaced.table_ids, vec![1, 2]);
        assert!(replaced.run_requested);
        assert!(!draft.run_requested);
    }

    #[test]
    fn test_blank_detection() {
        assert!(QueryDraft::new("  \n", None, vec![]).is_blank());
        assert!(!QueryDraft::new("x", None, vec![]).is_blank());
    }
}
