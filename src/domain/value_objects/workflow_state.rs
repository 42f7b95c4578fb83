use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{IndexRecord, PromptDocument, Table, VectorNamespace};
use crate::domain::value_objects::{Progress, TableSelection, WorkflowProgress};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    LoadingCatalog,
    Ready,
    Provisioning,
    CreatingIndex,
    Generating(Progress),
    Generated,
    Processing(Progress),
    Done,
    Failed(String),
}

impl WorkflowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowPhase::Done | WorkflowPhase::Failed(_))
    }

    /// True while a run holds the workflow; a second run must not start.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            WorkflowPhase::Provisioning
                | WorkflowPhase::CreatingIndex
                | WorkflowPhase::Generating(_)
                | WorkflowPhase::Generated
                | WorkflowPhase::Processing(_)
        )
    }

    pub fn can_transition_to(&self, next: &WorkflowPhase) -> bool {
        use WorkflowPhase::*;
        match (self, next) {
            // Processing absorbs per-document failures.
            (Processing(_), Failed(_)) => false,
            (Done, Failed(_)) | (Failed(_), Failed(_)) => false,
            (_, Failed(_)) => true,
            (Idle, LoadingCatalog) => true,
            (LoadingCatalog, Ready) => true,
            (Ready, Ready) | (Ready, LoadingCatalog) | (Ready, Provisioning) => true,
            (Provisioning, CreatingIndex) => true,
            (CreatingIndex, Generating(_)) => true,
            (Generating(_), Generating(_)) | (Generating(_), Generated) => true,
            (Generated, Processing(_)) | (Generated, Done) => true,
            (Processing(_), Processing(_)) | (Processing(_), Done) => true,
            (Done, Ready) | (Failed(_), Ready) => true,
            (Done, LoadingCatalog) | (Failed(_), LoadingCatalog) => true,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::LoadingCatalog => "loading catalog",
            WorkflowPhase::Ready => "ready",
            WorkflowPhase::Provisioning => "provisioning",
            WorkflowPhase::CreatingIndex => "creating index",
            WorkflowPhase::Generating(_) => "generating",
            WorkflowPhase::Generated => "generated",
            WorkflowPhase::Processing(_) => "processing",
            WorkflowPhase::Done => "done",
            WorkflowPhase::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowPhase::Generating(progress) | WorkflowPhase::Processing(progress) => {
                write!(f, "{} {}", self.label(), progress)
            }
            WorkflowPhase::Failed(message) => write!(f, "failed: {}", message),
            _ => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("illegal workflow transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: String,
    pub to: String,
}

/// Snapshot of one workflow run. Every change produces a new value with a
/// higher `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    run_id: Uuid,
    version: u64,
    phase: WorkflowPhase,
    database_id: Option<i64>,
    description: String,
    tables: Vec<Table>,
    selection: TableSelection,
    namespace: Option<VectorNamespace>,
    index: Option<IndexRecord>,
    documents: Vec<PromptDocument>,
    progress: WorkflowProgress,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            version: 0,
            phase: WorkflowPhase::Idle,
            database_id: None,
            description: String::new(),
            tables: Vec::new(),
            selection: TableSelection::empty(),
            namespace: None,
            index: None,
            documents: Vec::new(),
            progress: WorkflowProgress::default(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn phase(&self) -> &WorkflowPhase {
        &self.phase
    }

    pub fn database_id(&self) -> Option<i64> {
        self.database_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn selection(&self) -> &TableSelection {
        &self.selection
    }

    pub fn namespace(&self) -> Option<&VectorNamespace> {
        self.namespace.as_ref()
    }

    pub fn index(&self) -> Option<&IndexRecord> {
        self.index.as_ref()
    }

    pub fn documents(&self) -> &[PromptDocument] {
        &self.documents
    }

    pub fn progress(&self) -> WorkflowProgress {
        self.progress
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            WorkflowPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn transition(mut self, next: WorkflowPhase) -> Result<Self, InvalidTransition> {
        if !self.phase.can_transition_to(&next) {
            return Err(InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        if self.phase.is_terminal() && !next.is_terminal() {
            // A finished run re-entering the form starts a new run.
            self.run_id = Uuid::new_v4();
            self.started_at = Utc::now();
            self.finished_at = None;
            self.namespace = None;
            self.index = None;
            self.documents.clear();
            self.progress = WorkflowProgress::default();
        }
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.phase = next;
        Ok(self.bump())
    }

    /// Switches to another database. The selection resets to every table
    /// just loaded.
    pub fn with_database(mut self, database_id: i64, tables: Vec<Table>) -> Self {
        self.database_id = Some(database_id);
        self.selection = TableSelection::all_of(&tables);
        self.tables = tables;
        self.bump()
    }

    pub fn with_selected_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.selection = TableSelection::from_ids(ids, &self.tables);
        self.bump()
    }

    pub fn toggle_table(mut self, table_id: i64) -> Self {
        self.selection.toggle(table_id, &self.tables);
        self.bump()
    }

    pub fn select_all_tables(mut self) -> Self {
        self.selection.select_all(&self.tables);
        self.bump()
    }

    pub fn unselect_all_tables(mut self) -> Self {
        self.selection.unselect_all();
        self.bump()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.bump()
    }

    pub fn with_namespace(mut self, namespace: VectorNamespace) -> Self {
        self.namespace = Some(namespace);
        self.bump()
    }

    pub fn with_index(mut self, index: IndexRecord) -> Self {
        self.index = Some(index);
        self.bump()
    }

    pub fn with_documents(mut self, documents: Vec<PromptDocument>) -> Self {
        self.documents = documents;
        self.bump()
    }

    pub fn with_generation_progress(mut self, progress: Progress) -> Self {
        self.progress.generation = progress;
        self.bump()
    }

    pub fn with_processing_progress(mut self, progress: Progress) -> Self {
        self.progress.processing = progress;
        self.bump()
    }

    fn bump(mut self) -> Self {
        self.version += 1;
        self
    }
}
