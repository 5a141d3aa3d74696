//! Plan data model.
//!
//! A plan is an ordered sequence of [`Step`] declarations submitted for one
//! execution run. Steps may reference the output of earlier steps through
//! `{id}_output` placeholders in their arguments and must declare those
//! steps in `dependencies` so the engine can decide skip-vs-run.

mod memory;
mod result;

pub use memory::Memory;
pub use result::{StepResult, StepStatus};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single tool-invocation request within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Unique id within the plan. May be empty, in which case the engine
    /// falls back to a positional `step_{n}` id.
    #[serde(default)]
    pub id: String,

    /// Name of the tool to invoke. A step without a tool is never attempted.
    #[serde(default)]
    pub tool: Option<String>,

    /// Arguments passed to the tool. Values may be literals or whole-value
    /// `{id}_output` placeholders; insertion order is preserved.
    #[serde(default)]
    pub args: Map<String, Value>,

    /// Human-readable description. Informational only.
    #[serde(default)]
    pub description: String,

    /// Ids of steps whose output this step needs. Validated, not used to
    /// reorder: a dependency declared after this step always causes a skip.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Step {
    /// Create a step with an id and tool name, no args.
    pub fn new(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool: Some(tool.into()),
            args: Map::new(),
            description: String::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Add a dependency on another step's id.
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// The id used for memory entries and results: the declared id, or
    /// `step_{n}` for the given 1-based position when the id is empty.
    pub fn effective_id(&self, position: usize) -> String {
        if self.id.is_empty() {
            format!("step_{}", position)
        } else {
            self.id.clone()
        }
    }

    /// Whether the step declares a usable tool name.
    pub fn has_tool(&self) -> bool {
        matches!(&self.tool, Some(name) if !name.is_empty())
    }
}

/// Parse a plan from its JSON representation.
pub fn parse_plan(json: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_defaults() {
        let plan = parse_plan(r#"[{"id": "s1", "tool": "read_file", "args": {"path": "a.txt"}}]"#)
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].id, "s1");
        assert_eq!(plan[0].tool.as_deref(), Some("read_file"));
        assert!(plan[0].dependencies.is_empty());
        assert!(plan[0].description.is_empty());
    }

    #[test]
    fn test_args_preserve_declaration_order() {
        let plan =
            parse_plan(r#"[{"id": "s1", "tool": "t", "args": {"zeta": 1, "alpha": 2}}]"#).unwrap();
        let keys: Vec<&String> = plan[0].args.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_effective_id_fallback() {
        assert_eq!(Step::new("", "read_file").effective_id(3), "step_3");
        assert_eq!(Step::new("s1", "read_file").effective_id(3), "s1");
    }

    #[test]
    fn test_has_tool() {
        assert!(Step::new("s1", "read_file").has_tool());
        let mut step = Step::new("s1", "");
        assert!(!step.has_tool());
        step.tool = None;
        assert!(!step.has_tool());
    }
}
