use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl PromptStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, PromptStatus::Pending)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PromptStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PromptStatus::Failed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PromptStatus::Completed | PromptStatus::Failed)
    }

    /// A document never returns to `Pending`. Once processed, the latest
    /// reported outcome replaces the previous one.
    pub fn can_transition_to(&self, new_status: &PromptStatus) -> bool {
        match new_status {
            PromptStatus::Pending => false,
            PromptStatus::Completed | PromptStatus::Failed => true,
        }
    }

    /// Maps the boolean returned by the process endpoint.
    pub fn from_process_outcome(success: bool) -> Self {
        if success {
            PromptStatus::Completed
        } else {
            PromptStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStatus::Pending => "pending",
            PromptStatus::Completed => "completed",
            PromptStatus::Failed => "failed",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PromptStatus::Pending),
            "completed" => Ok(PromptStatus::Completed),
            "failed" => Ok(PromptStatus::Failed),
            other => Err(format!("Invalid prompt status: {}", other)),
        }
    }
}

impl std::fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
