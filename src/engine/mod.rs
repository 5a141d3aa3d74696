//! Plan-execution engine.
//!
//! Drives a plan end to end: for each step, in declared order, the engine
//! decides eligibility from dependency state, resolves placeholder
//! references against run memory, dispatches to the tool registry, and
//! appends exactly one result. The trail it returns always has the same
//! length and order as the input plan; a failing step never aborts the run,
//! it only makes its dependents skip.
//!
//! # Execution per step
//! 1. No usable tool name → `skipped`, never attempted
//! 2. First unsatisfied dependency (declared order) → `skipped`
//! 3. Placeholder substitution error → `failed`
//! 4. Tool dispatch: `Ok` → `success` and the output enters memory,
//!    `Err` → `failed` and memory holds `Null`
//!
//! Dependencies are validated, not used to reorder: a dependency declared
//! after its dependent always causes a skip.

pub mod deps;
pub mod placeholder;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::plan::{Memory, Step, StepResult};
use crate::tools::ToolRegistry;

/// Serializable record of one full plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<StepResult>,
}

/// Executes plans against a tool registry.
///
/// The engine holds no per-run state: every [`execute`](Self::execute) call
/// allocates a fresh [`Memory`], so concurrent independent runs over a
/// shared engine are safe.
pub struct StepExecutionEngine {
    registry: Arc<ToolRegistry>,
    working_dir: PathBuf,
}

impl StepExecutionEngine {
    /// Create an engine dispatching to `registry`, with tool paths resolved
    /// against `working_dir`.
    pub fn new(registry: Arc<ToolRegistry>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            working_dir: working_dir.into(),
        }
    }

    /// Execute every step of `plan` in declared order.
    ///
    /// Always returns one result per step, index-aligned with the input;
    /// never returns an error to the caller. Side effects are confined to
    /// whatever the invoked tools perform.
    pub async fn execute(&self, plan: &[Step]) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(plan.len());
        let mut memory = Memory::new();

        tracing::info!("Executing plan with {} steps", plan.len());

        for (index, step) in plan.iter().enumerate() {
            let position = index + 1;
            let step_id = step.effective_id(position);
            tracing::info!(
                "Step {}/{} (id: {}): {}",
                position,
                plan.len(),
                step_id,
                if step.description.is_empty() {
                    step.tool.as_deref().unwrap_or("-")
                } else {
                    step.description.as_str()
                }
            );

            if !step.has_tool() {
                tracing::warn!("Skipping step '{}': no tool declared", step_id);
                memory.record_unusable(step_id.as_str());
                results.push(StepResult::skipped(
                    position,
                    step_id.as_str(),
                    step.tool.clone(),
                    step.args.clone(),
                    "Tool name missing",
                ));
                continue;
            }
            let tool = step.tool.clone();

            if let Err(issue) = deps::check(&step.dependencies, &memory) {
                tracing::warn!("Skipping step '{}': {}", step_id, issue);
                memory.record_unusable(step_id.as_str());
                results.push(StepResult::skipped(
                    position,
                    step_id.as_str(),
                    tool,
                    step.args.clone(),
                    issue.to_string(),
                ));
                continue;
            }

            let resolved_args = match placeholder::substitute(&step.args, &memory) {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::error!("Step '{}' failed: {}", step_id, err);
                    memory.record_unusable(step_id.as_str());
                    results.push(StepResult::failed(
                        position,
                        step_id.as_str(),
                        tool,
                        step.args.clone(),
                        serde_json::Map::new(),
                        err.to_string(),
                    ));
                    continue;
                }
            };

            let tool_name = tool.clone().unwrap_or_default();
            let invocation = self
                .registry
                .invoke(
                    &tool_name,
                    Value::Object(resolved_args.clone()),
                    &self.working_dir,
                )
                .await;
            match invocation {
                Ok(output) => {
                    tracing::info!("Step '{}' succeeded", step_id);
                    memory.record_output(step_id.as_str(), output.clone());
                    results.push(StepResult::success(
                        position,
                        step_id.as_str(),
                        tool,
                        step.args.clone(),
                        resolved_args,
                        output,
                    ));
                }
                Err(err) => {
                    let message = format!("{:#}", err);
                    tracing::error!("Step '{}' failed: {}", step_id, message);
                    memory.record_unusable(step_id.as_str());
                    results.push(StepResult::failed(
                        position,
                        step_id.as_str(),
                        tool,
                        step.args.clone(),
                        resolved_args,
                        message,
                    ));
                }
            }
        }

        tracing::info!("Plan execution finished");
        results
    }

    /// Execute a plan and wrap the trail in a timestamped [`RunReport`].
    pub async fn run(&self, plan: &[Step]) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!("Starting plan run {}", run_id);

        let results = self.execute(plan).await;

        RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StepStatus;
    use serde_json::json;

    fn engine_in(dir: &std::path::Path) -> StepExecutionEngine {
        StepExecutionEngine::new(Arc::new(ToolRegistry::new()), dir)
    }

    #[tokio::test]
    async fn test_write_step_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![Step::new("s1", "write_to_file")
            .with_arg("path", "out.txt")
            .with_arg("content", "hello")];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, StepStatus::Success);
        assert_eq!(results[0].output, json!("Successfully wrote to out.txt"));
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "hello");
    }

    #[tokio::test]
    async fn test_read_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![Step::new("s1", "read_file").with_arg("path", "missing.txt")];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Failed);
        assert!(results[0].error.as_deref().unwrap().contains("missing.txt"));
        assert_eq!(results[0].output, Value::Null);
    }

    #[tokio::test]
    async fn test_failed_dependency_skips_dependent() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![
            Step::new("s1", "read_file").with_arg("path", "a.txt"),
            Step::new("s2", "write_to_file")
                .with_arg("path", "b.txt")
                .with_arg("content", "{s1_output}")
                .with_dependency("s1"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, StepStatus::Failed);
        assert_eq!(results[1].status, StepStatus::Skipped);
        assert!(results[1].skipped);
        assert_eq!(
            results[1].error.as_deref(),
            Some("Dependency 's1' failed/skipped")
        );
        assert!(!dir.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn test_read_copy_chain_resolves_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "source text").unwrap();
        let plan = vec![
            Step::new("s1", "read_file").with_arg("path", "a.txt"),
            Step::new("s2", "write_to_file")
                .with_arg("path", "b.txt")
                .with_arg("content", "{s1_output}")
                .with_dependency("s1"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Success);
        assert_eq!(results[1].status, StepStatus::Success);
        assert_eq!(results[1].args["content"], json!("{s1_output}"));
        assert_eq!(results[1].resolved_args["content"], json!("source text"));
        let copied = std::fs::read_to_string(dir.path().join("b.txt")).unwrap();
        assert_eq!(copied, "source text");
    }

    #[tokio::test]
    async fn test_missing_tool_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut no_tool = Step::new("s1", "");
        no_tool.tool = None;
        let plan = vec![no_tool, Step::new("s2", "")];

        let results = engine_in(dir.path()).execute(&plan).await;

        for result in &results {
            assert_eq!(result.status, StepStatus::Skipped);
            assert_eq!(result.error.as_deref(), Some("Tool name missing"));
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_fails() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![Step::new("s1", "teleport")];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Failed);
        assert!(results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("Unknown tool: teleport"));
    }

    #[tokio::test]
    async fn test_forward_declared_dependency_always_skips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let plan = vec![
            Step::new("first", "write_to_file")
                .with_arg("path", "c.txt")
                .with_arg("content", "{later_output}")
                .with_dependency("later"),
            Step::new("later", "read_file").with_arg("path", "a.txt"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Skipped);
        assert_eq!(
            results[0].error.as_deref(),
            Some("Dependency 'later' result not found")
        );
        // Declaration order is preserved: the later step still runs.
        assert_eq!(results[1].status, StepStatus::Success);
    }

    #[tokio::test]
    async fn test_undeclared_reference_is_a_failure_not_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![Step::new("s1", "write_to_file")
            .with_arg("path", "out.txt")
            .with_arg("content", "{ghost_output}")];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[0].status, StepStatus::Failed);
        assert!(!results[0].skipped);
        assert!(results[0].resolved_args.is_empty());
        assert!(results[0].error.as_deref().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_trail_is_complete_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![
            Step::new("s1", "read_file").with_arg("path", "missing.txt"),
            Step::new("", "list_files").with_arg("path", "."),
            Step::new("s3", "write_to_file")
                .with_arg("path", "x.txt")
                .with_arg("content", "y")
                .with_dependency("s1"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results.len(), plan.len());
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.step, i + 1);
        }
        // Empty id falls back to a positional one.
        assert_eq!(results[1].id, "step_2");
        assert_eq!(results[1].status, StepStatus::Success);
    }

    #[tokio::test]
    async fn test_skipped_dependent_of_skipped_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut no_tool = Step::new("s1", "");
        no_tool.tool = None;
        let plan = vec![
            no_tool,
            Step::new("s2", "list_files")
                .with_arg("path", ".")
                .with_dependency("s1"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[1].status, StepStatus::Skipped);
        assert_eq!(
            results[1].error.as_deref(),
            Some("Dependency 's1' failed/skipped")
        );
    }

    #[tokio::test]
    async fn test_list_output_substitutes_into_write() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        let plan = vec![
            Step::new("ls", "list_files").with_arg("path", "."),
            Step::new("save", "write_to_file")
                .with_arg("path", "listing.json")
                .with_arg("content", "{ls_output}")
                .with_dependency("ls"),
        ];

        let results = engine_in(dir.path()).execute(&plan).await;

        assert_eq!(results[1].status, StepStatus::Success);
        assert_eq!(
            results[1].resolved_args["content"],
            json!(["a.txt", "b.txt"])
        );
        let saved = std::fs::read_to_string(dir.path().join("listing.json")).unwrap();
        assert_eq!(saved, r#"["a.txt","b.txt"]"#);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "stable").unwrap();
        let plan = vec![
            Step::new("s1", "read_file").with_arg("path", "a.txt"),
            Step::new("s2", "write_to_file")
                .with_arg("path", "b.txt")
                .with_arg("content", "{s1_output}")
                .with_dependency("s1"),
        ];

        let engine = engine_in(dir.path());
        let first = engine.execute(&plan).await;
        let second = engine.execute(&plan).await;

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.status, b.status);
            assert_eq!(a.resolved_args, b.resolved_args);
            assert_eq!(a.output, b.output);
        }
    }

    #[tokio::test]
    async fn test_run_report_wraps_trail() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![Step::new("s1", "list_files").with_arg("path", ".")];

        let report = engine_in(dir.path()).run(&plan).await;

        assert_eq!(report.results.len(), 1);
        assert!(report.finished_at >= report.started_at);
    }
}
