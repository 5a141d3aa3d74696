//! Pipeline run state and report types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stage::Stage;

/// Where a pipeline run currently stands.
///
/// Advances monotonically through the stage-completion labels until
/// `completed`, or drops into the terminal `error` state; once there, no
/// further stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    PlanningDone,
    ResearchDone,
    ExecutionDone,
    Completed,
    Error,
}

/// Structured record of a stage failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageError {
    /// Wire name of the failed stage, or `"unknown"` for the defensive
    /// fallback.
    pub stage: String,
    pub message: String,
}

impl StageError {
    /// An error attributed to a stage. An empty message is normalized to
    /// the generic one so consumers always see a reason.
    pub fn for_stage(stage: Stage, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "An unknown error occurred".to_string()
        } else {
            message
        };
        Self {
            stage: stage.name().to_string(),
            message,
        }
    }

    /// Fallback for an error state that carries no record.
    pub fn unknown() -> Self {
        Self {
            stage: "unknown".to_string(),
            message: "An unknown error occurred".to_string(),
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.message)
    }
}

/// Mutable state of one pipeline run. Freshly allocated per run, never
/// shared.
#[derive(Debug)]
pub struct PipelineState {
    pub task: String,
    pub plan: Value,
    pub research: Value,
    pub execution: Value,
    pub review: Value,
    pub status: PipelineStatus,
    pub error: Option<StageError>,
}

impl PipelineState {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            plan: Value::Null,
            research: Value::Null,
            execution: Value::Null,
            review: Value::Null,
            status: PipelineStatus::Pending,
            error: None,
        }
    }

    /// Freeze the state into the report handed back to the caller.
    pub fn into_report(self) -> PipelineReport {
        let error = match (self.status, self.error) {
            // An error state always carries a record; fill one in if not.
            (PipelineStatus::Error, None) => Some(StageError::unknown()),
            (_, error) => error,
        };
        PipelineReport {
            task: self.task,
            status: self.status,
            results: StageResults {
                plan: self.plan,
                research: self.research,
                execution: self.execution,
                review: self.review,
            },
            error,
        }
    }
}

/// The four stage-result slots. Slots of stages that never ran stay `Null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResults {
    pub plan: Value,
    pub research: Value,
    pub execution: Value,
    pub review: Value,
}

/// Complete record of one pipeline run; returned for every run, successful
/// or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub task: String,
    pub status: PipelineStatus,
    pub results: StageResults,
    pub error: Option<StageError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        let labels: Vec<String> = [
            PipelineStatus::Pending,
            PipelineStatus::PlanningDone,
            PipelineStatus::ResearchDone,
            PipelineStatus::ExecutionDone,
            PipelineStatus::Completed,
            PipelineStatus::Error,
        ]
        .iter()
        .map(|s| serde_json::to_string(s).unwrap())
        .collect();
        assert_eq!(
            labels,
            vec![
                "\"pending\"",
                "\"planning_done\"",
                "\"research_done\"",
                "\"execution_done\"",
                "\"completed\"",
                "\"error\"",
            ]
        );
    }

    #[test]
    fn test_empty_message_normalized() {
        let err = StageError::for_stage(Stage::Research, "  ");
        assert_eq!(err.stage, "research");
        assert_eq!(err.message, "An unknown error occurred");

        let err = StageError::for_stage(Stage::Research, "boom");
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_error_state_without_record_gets_fallback() {
        let mut state = PipelineState::new("t");
        state.status = PipelineStatus::Error;
        let report = state.into_report();
        let error = report.error.unwrap();
        assert_eq!(error.stage, "unknown");
        assert_eq!(error.message, "An unknown error occurred");
    }

    #[test]
    fn test_fresh_state_slots_are_null() {
        let state = PipelineState::new("t");
        assert_eq!(state.status, PipelineStatus::Pending);
        assert!(state.plan.is_null());
        assert!(state.research.is_null());
        assert!(state.execution.is_null());
        assert!(state.review.is_null());
    }
}
