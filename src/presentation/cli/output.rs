use crate::application::use_cases::{DatabaseLoad, ProcessingOutcome, TableLoad};
use crate::domain::entities::PromptDocument;
use crate::domain::value_objects::WorkflowState;

pub fn databases(load: &DatabaseLoad) -> String {
    if load.databases.is_empty() {
        return match &load.load_error {
            Some(e) => format!("No databases available ({})\n", e),
            None => "No databases available\n".to_string(),
        };
    }

    let mut out = format!("{:>6}  NAME\n", "ID");
    for database in &load.databases {
        out.push_str(&format!("{:>6}  {}\n", database.id, database.display_label()));
    }
    out
}

pub fn tables(load: &TableLoad) -> String {
    if load.tables.is_empty() {
        return format!("No tables found for database {}\n", load.database_id);
    }

    let mut out = format!("{:>6}  {:<8}  NAME\n", "ID", "SELECTED");
    for table in &load.tables {
        let mark = if load.selection.contains(table.id) { "[x]" } else { "[ ]" };
        out.push_str(&format!("{:>6}  {:<8}  {}\n", table.id, mark, table.name));
    }
    out
}

pub fn prompts(documents: &[PromptDocument]) -> String {
    if documents.is_empty() {
        return "No prompts found\n".to_string();
    }

    let mut out = format!("{:>6}  {:>6}  {:<10}  NAME\n", "ID", "TABLE", "STATUS");
    for document in documents {
        out.push_str(&format!(
            "{:>6}  {:>6}  {:<10}  {}\n",
            document.id, document.table_reference, document.status, document.name
        ));
    }
    out
}

pub fn processing_summary(outcome: &ProcessingOutcome) -> String {
    format!(
        "Processed {} prompts: {} completed, {} failed\n",
        outcome.processed(),
        outcome.completed(),
        outcome.failed()
    )
}

pub fn build_summary(state: &WorkflowState) -> String {
    let progress = state.progress();
    let mut out = match state.index() {
        Some(index) => format!("Index {} created in namespace {}\n", index.id, index.namespace),
        None => String::new(),
    };
    out.push_str(&format!("Generation: {}\n", progress.generation));
    if progress.processing.total() > 0 {
        out.push_str(&format!("Processing: {}\n", progress.processing));
    }
    out.push_str(&prompts(state.documents()));
    out
}
