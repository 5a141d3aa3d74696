//! Tool system for the plan-execution engine.
//!
//! Tools are the "hands" of an executed plan: each step names a tool, and
//! the engine dispatches through the registry built here. Adding a tool is
//! registration, not branch editing.
//!
//! ## Workspace-First Design
//!
//! Tools work **relative to the working directory** by default:
//! - Relative paths (e.g., `output/report.md`) resolve from the working dir
//! - Absolute paths (e.g., `/etc/hosts`) work as an escape hatch
//!
//! ## Outputs
//!
//! Tools return a [`serde_json::Value`], not display text: a step's output
//! is stored in run memory and may be spliced verbatim into a later step's
//! arguments. `read_file` returns a string, `list_files` an array,
//! `execute_command` an object.

mod directory;
mod file_ops;
mod terminal;

pub use directory::ListFiles;
pub use file_ops::{ReadFile, WriteToFile};
pub use terminal::ExecuteCommand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

/// Resolve a path relative to the working directory.
///
/// - Relative paths are joined with `working_dir`
/// - Absolute paths are used as-is (escape hatch)
pub fn resolve_path(path_str: &str, working_dir: &Path) -> PathBuf {
    let path = Path::new(path_str);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

/// Information about a tool for display purposes.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// The `working_dir` is the default directory for relative paths.
    /// Tools can accept absolute paths to operate anywhere on the system.
    async fn invoke(&self, args: Value, working_dir: &Path) -> anyhow::Result<Value>;
}

/// Registry of available tools, keyed by name. Built once at startup and
/// shared immutably across runs.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new registry with all default tools.
    pub fn new() -> Self {
        let registry_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let mut registry = Self::empty();

        registry.register(Arc::new(file_ops::ReadFile));
        registry.register(Arc::new(file_ops::WriteToFile));
        registry.register(Arc::new(directory::ListFiles));
        registry.register(Arc::new(terminal::ExecuteCommand));

        tracing::debug!(
            "Registry {} ready with {} tools",
            registry_id,
            registry.tools.len()
        );
        registry
    }

    /// Create an empty registry (no built-in tools).
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name, replacing any previous handler.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Check if a tool exists by name.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Tool descriptors as a JSON array of `{name, description, parameters}`.
    ///
    /// This is the table an external planner is shown when it is asked to
    /// produce a plan over these tools.
    pub fn schemas(&self) -> Value {
        let mut entries: Vec<Value> = self
            .tools
            .values()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect();
        entries.sort_by_key(|e| e["name"].as_str().unwrap_or_default().to_string());
        Value::Array(entries)
    }

    /// Execute a tool by name.
    ///
    /// The `working_dir` is the default directory for relative paths.
    pub async fn invoke(
        &self,
        name: &str,
        args: Value,
        working_dir: &Path,
    ) -> anyhow::Result<Value> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.invoke(args, working_dir).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
