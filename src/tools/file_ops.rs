//! File operation tools: read and write files.
//!
//! ## Workspace-First Design
//!
//! These tools work relative to the working directory by default:
//! - `output/report.md` → `{working_dir}/output/report.md`
//! - `/etc/hosts` → absolute path for system access (escape hatch)

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{resolve_path, Tool};

/// Read the contents of a file.
///
/// Returns the raw text, unadorned: the output may be spliced into a later
/// step's arguments (e.g. copied into a `write_to_file` content argument).
pub struct ReadFile;

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a file's contents. Use relative paths like 'notes/input.txt' (recommended) or absolute paths for system files."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path. Relative paths resolve from the working directory."
                }
            },
            "required": ["path"]
        })
    }

    async fn invoke(&self, args: Value, working_dir: &Path) -> anyhow::Result<Value> {
        let path = args["path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'path' argument"))?;

        let resolved = resolve_path(path, working_dir);

        if !resolved.exists() {
            return Err(anyhow::anyhow!("File not found: {}", path));
        }

        let content = tokio::fs::read_to_string(&resolved).await?;
        Ok(Value::String(content))
    }
}

/// Write content to a file (create or overwrite).
pub struct WriteToFile;

#[async_trait]
impl Tool for WriteToFile {
    fn name(&self) -> &str {
        "write_to_file"
    }

    fn description(&self) -> &str {
        "Write content to a file. Creates parent directories as needed. Use relative paths like 'output/report.md' (recommended) to stay in the working directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path. Relative paths resolve from the working directory."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write. A non-string value (e.g. a substituted step output) is written as JSON text."
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn invoke(&self, args: Value, working_dir: &Path) -> anyhow::Result<Value> {
        let path = args["path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'path' argument"))?;
        let content = match &args["content"] {
            Value::Null => return Err(anyhow::anyhow!("Missing 'content' argument")),
            Value::String(text) => text.clone(),
            other => serde_json::to_string(other)?,
        };

        let resolved = resolve_path(path, working_dir);

        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&resolved, &content).await?;

        Ok(Value::String(format!("Successfully wrote to {}", path)))
    }
}
