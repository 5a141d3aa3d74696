//! Pipeline stage identifiers.

use serde::{Deserialize, Serialize};

/// One phase of the four-phase pipeline. Each stage is backed by exactly
/// one external agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Planning,
    Research,
    Execution,
    Review,
}

impl Stage {
    /// The stage's wire name, used in error records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Research => "research",
            Self::Execution => "execution",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
