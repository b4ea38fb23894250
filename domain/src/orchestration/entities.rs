//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Stage of a panel run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Fan-out to every provider on the panel
    Dispatch,
    /// Second-stage synthesis over the aggregated text
    Summary,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Dispatch => "dispatch",
            Stage::Summary => "summary",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Dispatch => "Asking providers",
            Stage::Summary => "Summarizing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
