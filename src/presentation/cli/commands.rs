use tokio::task::{JoinError, JoinHandle};

use crate::application::errors::WorkflowError;
use crate::application::services::RunOptions;
use crate::domain::entities::QueryDraft;
use crate::domain::value_objects::WorkflowPhase;
use crate::infrastructure::AppContainer;
use crate::infrastructure::http::ClientBuildError;
use crate::presentation::cli::{Cli, Command, output};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientBuildError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let container = AppContainer::new(cli.client_config())?;
    execute(&container, cli.command).await
}

pub async fn execute(container: &AppContainer, command: Command) -> Result<(), CliError> {
    match command {
        Command::Databases => {
            let load = container.load_catalog_use_case.list_databases().await;
            print!("{}", output::databases(&load));
        }
        Command::Tables { database } => {
            let load = container.load_catalog_use_case.list_tables(database).await;
            print!("{}", output::tables(&load));
        }
        Command::Build {
            database,
            description,
            tables,
            exclude,
            skip_processing,
        } => {
            build(container, database, description, tables, exclude, skip_processing).await?;
        }
        Command::Prompts { index } => {
            let documents = container.prompt_service.list_prompts().await.map_err(WorkflowError::from)?;
            let documents: Vec<_> = documents
                .into_iter()
                .filter(|document| index.is_none_or(|id| document.belongs_to_index(id)))
                .collect();
            print!("{}", output::prompts(&documents));
        }
        Command::Process { index } => {
            let outcome = container
                .process_prompts_use_case
                .process_pending(index, |progress| {
                    tracing::info!("Processing prompts: {}", progress);
                })
                .await?;
            print!("{}", output::prompts(&outcome.documents));
            print!("{}", output::processing_summary(&outcome));
        }
        Command::Ask {
            database,
            question,
            tables,
        } => {
            let draft = QueryDraft::new(question, database, tables);
            match container.generate_sql_use_case.execute(&draft).await? {
                Some(updated) => println!("{}", updated.text),
                None => tracing::warn!("Nothing to generate: the question is blank"),
            }
        }
    }
    Ok(())
}

async fn build(
    container: &AppContainer,
    database: i64,
    description: String,
    tables: Option<Vec<i64>>,
    exclude: Vec<i64>,
    skip_processing: bool,
) -> Result<(), CliError> {
    let workflow = container.index_build_workflow.clone();

    let load = workflow.select_database(database).await?;
    if let Some(e) = &load.load_error {
        tracing::warn!("Could not load tables of database {}: {}", database, e);
    }
    if let Some(ids) = tables {
        workflow.select_tables(ids);
    }
    for table_id in exclude {
        if workflow.state().selection().contains(table_id) {
            workflow.toggle_table(table_id);
        }
    }
    workflow.set_description(description);

    let mut receiver = workflow.subscribe();
    let reporter = tokio::spawn(async move {
        let mut last_phase = String::new();
        while receiver.changed().await.is_ok() {
            let phase = receiver.borrow_and_update().phase().clone();
            let label = phase.to_string();
            if label != last_phase {
                tracing::info!("Index build: {}", label);
                last_phase = label;
            }
            if phase.is_terminal() {
                break;
            }
        }
    });

    let result = workflow
        .run(RunOptions {
            process: !skip_processing,
        })
        .await;
    // Validation errors never reach a terminal phase.
    let abort = result.is_err() && !matches!(workflow.state().phase(), WorkflowPhase::Failed(_));
    if let Some(e) = stop_reporter(reporter, abort).await {
        tracing::warn!("Phase reporter stopped unexpectedly: {}", e);
    }

    let state = result?;
    print!("{}", output::build_summary(&state));
    Ok(())
}

/// Waits for the reporter task; returns its error unless it was cancelled.
async fn stop_reporter(reporter: JoinHandle<()>, abort: bool) -> Option<JoinError> {
    if abort {
        reporter.abort();
    }
    match reporter.await {
        Err(e) if !e.is_cancelled() => Some(e),
        _ => None,
    }
}
