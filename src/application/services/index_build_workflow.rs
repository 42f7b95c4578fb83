use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::application::errors::WorkflowError;
use crate::application::use_cases::provision_index::validate_description;
use crate::application::use_cases::{
    DatabaseLoad, GeneratePromptsUseCase, LoadCatalogUseCase, ProcessPromptsUseCase,
    ProvisionIndexUseCase, TableLoad,
};
use crate::domain::value_objects::{InvalidTransition, Progress, WorkflowPhase, WorkflowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Submit the generated prompts for processing once generation is done.
    pub process: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { process: true }
    }
}

/// Drives one index build: catalog → provisioning → generation → processing.
///
/// The current [`WorkflowState`] lives in a watch channel; every step replaces
/// it with the value returned by a state transition, so observers see each
/// version in order. Only one run may be active at a time.
pub struct IndexBuildWorkflow {
    catalog: Arc<LoadCatalogUseCase>,
    provisioner: Arc<ProvisionIndexUseCase>,
    generator: Arc<GeneratePromptsUseCase>,
    processor: Arc<ProcessPromptsUseCase>,
    state: watch::Sender<WorkflowState>,
    running: AtomicBool,
}

struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl IndexBuildWorkflow {
    pub fn new(
        catalog: Arc<LoadCatalogUseCase>,
        provisioner: Arc<ProvisionIndexUseCase>,
        generator: Arc<GeneratePromptsUseCase>,
        processor: Arc<ProcessPromptsUseCase>,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::new());
        Self {
            catalog,
            provisioner,
            generator,
            processor,
            state,
            running: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub async fn load_databases(&self) -> DatabaseLoad {
        self.catalog.list_databases().await
    }

    /// Loads the tables of `database_id` and selects all of them. A failed
    /// load leaves the form usable with an empty table list.
    pub async fn select_database(&self, database_id: i64) -> Result<TableLoad, WorkflowError> {
        if self.is_running() {
            return Err(WorkflowError::AlreadyRunning);
        }
        self.apply(|state| state.transition(WorkflowPhase::LoadingCatalog))?;
        let load = self.catalog.list_tables(database_id).await;
        let tables = load.tables.clone();
        self.apply(|state| {
            state
                .with_database(database_id, tables)
                .transition(WorkflowPhase::Ready)
        })?;
        Ok(load)
    }

    pub fn set_description(&self, description: impl Into<String>) -> WorkflowState {
        let description = description.into();
        self.edit(|state| state.with_description(description))
    }

    pub fn toggle_table(&self, table_id: i64) -> WorkflowState {
        self.edit(|state| state.toggle_table(table_id))
    }

    pub fn select_all_tables(&self) -> WorkflowState {
        self.edit(WorkflowState::select_all_tables)
    }

    pub fn unselect_all_tables(&self) -> WorkflowState {
        self.edit(WorkflowState::unselect_all_tables)
    }

    pub fn select_tables(&self, table_ids: Vec<i64>) -> WorkflowState {
        self.edit(|state| state.with_selected_ids(table_ids))
    }

    /// Whether a run could start right now.
    pub fn can_start(&self) -> bool {
        let state = self.state.borrow();
        !self.is_running()
            && state.database_id().is_some()
            && !state.selection().is_empty()
            && matches!(
                state.phase(),
                WorkflowPhase::Ready | WorkflowPhase::Done | WorkflowPhase::Failed(_)
            )
    }

    /// Runs the build for the current database, description and selection.
    /// Validation problems are returned without touching the state; failures
    /// after that leave the state in `Failed`.
    pub async fn run(&self, options: RunOptions) -> Result<WorkflowState, WorkflowError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkflowError::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);

        let snapshot = self.state();
        let database_id = snapshot.database_id().ok_or_else(|| {
            WorkflowError::Validation("Please select a database first".to_string())
        })?;
        if snapshot.selection().is_empty() {
            return Err(WorkflowError::Validation(
                "Please select at least one table".to_string(),
            ));
        }
        validate_description(snapshot.description())?;

        let description = snapshot.description().to_string();
        let table_ids = snapshot.selection().ids();

        if !matches!(snapshot.phase(), WorkflowPhase::Ready) {
            self.apply(|state| state.transition(WorkflowPhase::Ready))?;
        }

        let started = self.apply(|state| state.transition(WorkflowPhase::Provisioning))?;
        tracing::info!(
            "Starting index build {} for database {} with {} tables",
            started.run_id(),
            database_id,
            table_ids.len()
        );
        let namespace = match self.provisioner.provision_namespace(database_id).await {
            Ok(namespace) => namespace,
            Err(e) => return Err(self.fail(e)),
        };

        self.apply(|state| {
            state
                .with_namespace(namespace.clone())
                .transition(WorkflowPhase::CreatingIndex)
        })?;
        let index = match self
            .provisioner
            .create_index_record(database_id, &description, table_ids.clone(), namespace)
            .await
        {
            Ok(index) => index,
            Err(e) => return Err(self.fail(e)),
        };

        let index_id = index.id;
        let total = table_ids.len();
        self.apply(|state| {
            state
                .with_index(index)
                .with_generation_progress(Progress::starting(total))
                .transition(WorkflowPhase::Generating(Progress::starting(total)))
        })?;

        let generation = self
            .generator
            .generate_all(index_id, database_id, table_ids, |progress| {
                self.report(|state| {
                    state
                        .with_generation_progress(progress)
                        .transition(WorkflowPhase::Generating(progress))
                });
            })
            .await;

        let documents = generation.documents;
        if let Some(e) = generation.error {
            self.apply(|state| Ok(state.with_documents(documents)))?;
            return Err(self.fail(e));
        }

        self.apply(|state| {
            state
                .with_documents(documents.clone())
                .transition(WorkflowPhase::Generated)
        })?;

        if !options.process || documents.is_empty() {
            if documents.is_empty() {
                tracing::warn!("No prompts were generated, skipping processing");
            }
            return self.apply(|state| state.transition(WorkflowPhase::Done));
        }

        let count = documents.len();
        self.apply(|state| {
            state
                .with_processing_progress(Progress::starting(count))
                .transition(WorkflowPhase::Processing(Progress::starting(count)))
        })?;

        let processing = self
            .processor
            .process_all(documents, |progress| {
                self.report(|state| {
                    state
                        .with_processing_progress(progress)
                        .transition(WorkflowPhase::Processing(progress))
                });
            })
            .await;

        let finished = self.apply(|state| {
            state
                .with_documents(processing.documents)
                .transition(WorkflowPhase::Done)
        })?;
        tracing::info!(
            "Index build {} finished: {} prompts processed",
            finished.run_id(),
            finished.progress().processing.done()
        );
        Ok(finished)
    }

    fn apply<F>(&self, step: F) -> Result<WorkflowState, WorkflowError>
    where
        F: FnOnce(WorkflowState) -> Result<WorkflowState, InvalidTransition>,
    {
        let next = step(self.state())?;
        self.state.send_replace(next.clone());
        Ok(next)
    }

    /// Progress updates from inside a loop; a rejected transition is logged
    /// rather than aborting the loop.
    fn report<F>(&self, step: F)
    where
        F: FnOnce(WorkflowState) -> Result<WorkflowState, InvalidTransition>,
    {
        if let Err(e) = self.apply(step) {
            tracing::warn!("Dropped progress update: {}", e);
        }
    }

    /// Edits made while the form is open; ignored during a run.
    fn edit<F>(&self, step: F) -> WorkflowState
    where
        F: FnOnce(WorkflowState) -> WorkflowState,
    {
        if self.is_running() {
            tracing::warn!("Ignoring edit while a run is in progress");
            return self.state();
        }
        let next = step(self.state());
        self.state.send_replace(next.clone());
        next
    }

    fn fail(&self, error: WorkflowError) -> WorkflowError {
        tracing::error!("Index build failed: {}", error);
        let message = error.to_string();
        if let Err(e) = self.apply(|state| state.transition(WorkflowPhase::Failed(message))) {
            tracing::warn!("Could not record failure: {}", e);
        }
        error
    }
}
