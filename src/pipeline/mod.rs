//! Four-stage agent pipeline: plan → research → execute → review.
//!
//! Each stage invokes exactly one external agent, stores its result in the
//! matching slot, and advances the status label. Any stage failure
//! short-circuits the run into a terminal error record; later stages are
//! never invoked. The stage results are threaded as a tagged
//! `Result<Value, StageError>` through one `?`-sequenced function, so the
//! short-circuit is in the control flow, not in post-hoc field inspection.

mod stage;
mod state;

pub use stage::Stage;
pub use state::{PipelineReport, PipelineState, PipelineStatus, StageError, StageResults};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

/// An external LLM-driven agent backing one pipeline stage.
///
/// Prompt construction and model-output parsing happen behind this trait;
/// the pipeline only sees a structured value or a failure.
#[async_trait]
pub trait StageAgent: Send + Sync {
    /// A human-readable name for logs.
    fn name(&self) -> &str;

    /// Process the stage input and return the stage result.
    async fn process(&self, input: Value) -> anyhow::Result<Value>;
}

/// Sequences the four stage agents over a per-run [`PipelineState`].
pub struct PipelineController {
    planner: Arc<dyn StageAgent>,
    researcher: Arc<dyn StageAgent>,
    executor: Arc<dyn StageAgent>,
    reviewer: Arc<dyn StageAgent>,
}

impl PipelineController {
    pub fn new(
        planner: Arc<dyn StageAgent>,
        researcher: Arc<dyn StageAgent>,
        executor: Arc<dyn StageAgent>,
        reviewer: Arc<dyn StageAgent>,
    ) -> Self {
        Self {
            planner,
            researcher,
            executor,
            reviewer,
        }
    }

    /// Run the pipeline for `task`. Always returns a complete record; a
    /// stage failure is reported in `status`/`error`, never raised.
    pub async fn run(&self, task: &str) -> PipelineReport {
        let mut state = PipelineState::new(task);
        tracing::info!("Starting pipeline for task: {}", task);

        if let Err(err) = self.advance(&mut state).await {
            tracing::error!("Pipeline halted: {}", err);
            state.status = PipelineStatus::Error;
            state.error = Some(err);
        }

        state.into_report()
    }

    /// Drive the stages in order, short-circuiting on the first failure.
    async fn advance(&self, state: &mut PipelineState) -> Result<(), StageError> {
        state.plan = self
            .invoke_stage(
                Stage::Planning,
                &self.planner,
                json!({"task": state.task.clone()}),
            )
            .await?;
        state.status = PipelineStatus::PlanningDone;

        state.research = self
            .invoke_stage(
                Stage::Research,
                &self.researcher,
                json!({"topic": state.task.clone()}),
            )
            .await?;
        state.status = PipelineStatus::ResearchDone;

        state.execution = self
            .invoke_stage(
                Stage::Execution,
                &self.executor,
                json!({
                    "task": state.task.clone(),
                    "plan": state.plan.clone(),
                    "research": state.research.clone(),
                }),
            )
            .await?;
        state.status = PipelineStatus::ExecutionDone;

        let requirements = state
            .plan
            .get("requirements")
            .cloned()
            .unwrap_or_else(|| json!([]));
        let quality_criteria = state
            .plan
            .get("quality_criteria")
            .cloned()
            .unwrap_or_else(|| json!([]));
        state.review = self
            .invoke_stage(
                Stage::Review,
                &self.reviewer,
                json!({
                    "artifact": state.execution.clone(),
                    "requirements": requirements,
                    "quality_criteria": quality_criteria,
                }),
            )
            .await?;
        state.status = PipelineStatus::Completed;

        Ok(())
    }

    async fn invoke_stage(
        &self,
        stage: Stage,
        agent: &Arc<dyn StageAgent>,
        input: Value,
    ) -> Result<Value, StageError> {
        tracing::info!("Running {} stage (agent: {})", stage, agent.name());
        agent.process(input).await.map_err(|err| {
            let err = StageError::for_stage(stage, format!("{:#}", err));
            tracing::error!("{}", err);
            err
        })
    }
}
