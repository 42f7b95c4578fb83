use serde::{Deserialize, Serialize};

/// Numerator/denominator pair behind a progress bar. The percentage is always
/// derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    done: usize,
    total: usize,
}

impl Progress {
    pub fn new(done: usize, total: usize) -> Self {
        Self {
            done: done.min(total),
            total,
        }
    }

    pub fn starting(total: usize) -> Self {
        Self::new(0, total)
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn advance(self) -> Self {
        Self::new(self.done + 1, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }

    /// `round(done / total * 100)`, or 0 for an empty run.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u8
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent())
    }
}

/// Generation and processing progress, tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub generation: Progress,
    pub processing: Progress,
}
