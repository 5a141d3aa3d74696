//! Step result trail entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Terminal status of one executed (or bypassed) step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The tool ran and returned a value.
    Success,
    /// The tool (or placeholder substitution) raised an error.
    Failed,
    /// The step was never attempted: no tool, or an unsatisfied dependency.
    Skipped,
}

/// Outcome record for one step of a plan run.
///
/// The engine emits exactly one `StepResult` per declared step, in
/// declaration order, regardless of how the step ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// 1-based position within the plan.
    pub step: usize,

    /// The step's effective id.
    pub id: String,

    /// Declared tool name, if any.
    pub tool: Option<String>,

    /// Arguments as declared, placeholders intact.
    pub args: Map<String, Value>,

    /// Arguments after placeholder substitution. Empty when the step never
    /// reached substitution.
    pub resolved_args: Map<String, Value>,

    /// How the step ended.
    pub status: StepStatus,

    /// The tool's returned value; `Null` unless the step succeeded.
    pub output: Value,

    /// Error message for failed and skipped steps.
    pub error: Option<String>,

    /// Convenience flag mirroring `status == Skipped`.
    pub skipped: bool,
}

impl StepResult {
    /// A successful step with its resolved arguments and tool output.
    pub fn success(
        step: usize,
        id: impl Into<String>,
        tool: Option<String>,
        args: Map<String, Value>,
        resolved_args: Map<String, Value>,
        output: Value,
    ) -> Self {
        Self {
            step,
            id: id.into(),
            tool,
            args,
            resolved_args,
            status: StepStatus::Success,
            output,
            error: None,
            skipped: false,
        }
    }

    /// A step whose tool (or substitution) raised an error.
    pub fn failed(
        step: usize,
        id: impl Into<String>,
        tool: Option<String>,
        args: Map<String, Value>,
        resolved_args: Map<String, Value>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step,
            id: id.into(),
            tool,
            args,
            resolved_args,
            status: StepStatus::Failed,
            output: Value::Null,
            error: Some(error.into()),
            skipped: false,
        }
    }

    /// A step that was never attempted.
    pub fn skipped(
        step: usize,
        id: impl Into<String>,
        tool: Option<String>,
        args: Map<String, Value>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step,
            id: id.into(),
            tool,
            args,
            resolved_args: Map::new(),
            status: StepStatus::Skipped,
            output: Value::Null,
            error: Some(error.into()),
            skipped: true,
        }
    }
}
