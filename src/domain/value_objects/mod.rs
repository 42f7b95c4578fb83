pub mod progress;
pub mod prompt_status;
pub mod table_selection;
pub mod workflow_state;

pub use progress::{Progress, WorkflowProgress};
pub use prompt_status::PromptStatus;
pub use table_selection::TableSelection;
pub use workflow_state::{InvalidTransition, WorkflowPhase, WorkflowState};
