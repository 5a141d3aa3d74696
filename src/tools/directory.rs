//! Directory listing tool.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};
use walkdir::WalkDir;

use super::{resolve_path, Tool};

/// List the entries of a directory.
///
/// Returns a sorted array of entry names (files and subdirectories, one
/// level deep) so repeated runs over an unchanged tree produce identical
/// output.
pub struct ListFiles;

#[async_trait]
impl Tool for ListFiles {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and subdirectories of a directory. Use '.' for the working directory, relative paths like 'src/', or absolute paths."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path. Relative paths resolve from the working directory."
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
            return Err(anyhow::anyhow!("Directory not found: {}", path));
        }
        if !resolved.is_dir() {
            return Err(anyhow::anyhow!("Path is not a directory: {}", path));
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&resolved)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(Value::String(name));
        }

        Ok(Value::Array(entries))
    }
}
