pub mod index_build_workflow;
pub mod prompt_renderer;
pub mod sequential_fold;

pub use index_build_workflow::{IndexBuildWorkflow, RunOptions};
pub use prompt_renderer::{PromptRenderer, Relationship, RenderedPrompt};
