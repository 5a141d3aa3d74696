//! Shell command execution tool.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;

use super::Tool;

/// Sanitize command output to be safe for LLM consumption.
/// Removes binary garbage while preserving valid text.
fn sanitize_output(bytes: &[u8]) -> String {
    let non_printable_count = bytes
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    // If more than 10% is non-printable (excluding newlines/tabs), it's likely binary
    if bytes.len() > 100 && non_printable_count > bytes.len() / 10 {
        return format!(
            "[Binary output detected - {} bytes, {}% non-printable]",
            bytes.len(),
            non_printable_count * 100 / bytes.len()
        );
    }

    let text = String::from_utf8_lossy(bytes);
    text.chars()
        .filter(|&c| c == '\n' || c == '\r' || c == '\t' || (c >= ' ' && c != '\u{FFFD}'))
        .collect()
}

/// Command patterns that could damage the system. Blocked before execution.
const DANGEROUS_PATTERNS: &[&str] = &["rm -rf /", "rm -rf /*", "> /dev/", "dd if=/dev/"];

fn validate_command(cmd: &str) -> Result<(), String> {
    let cmd_trimmed = cmd.trim();
    for pattern in DANGEROUS_PATTERNS {
        if cmd_trimmed.starts_with(pattern) {
            return Err(format!("Blocked dangerous command pattern '{}'", pattern));
        }
    }
    Ok(())
}

/// Run a shell command.
///
/// Succeeds with `{stdout, stderr}` on exit code 0; fails on non-zero exit
/// with the captured streams surfaced in the error message. No timeout is
/// imposed here - callers that need deadlines wrap the call externally.
pub struct ExecuteCommand;

#[async_trait]
impl Tool for ExecuteCommand {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command in the working directory. Use for tests, builds, file inspection, etc."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute. Relative paths resolve from the working directory."
                }
            },
            "required": ["command"]
        })
    }

    async fn invoke(&self, args: Value, working_dir: &Path) -> anyhow::Result<Value> {
        let command = args["command"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'command' argument"))?;

        if let Err(msg) = validate_command(command) {
            tracing::warn!("Blocked dangerous command: {}", command);
            return Err(anyhow::anyhow!("{}", msg));
        }

        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("/bin/sh", "-c")
        };

        tracing::info!("Executing command in {:?}: {}", working_dir, command);

        let output = Command::new(shell)
            .arg(shell_arg)
            .arg(command)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to execute command: {}", e))?;

        let stdout = sanitize_output(&output.stdout);
        let stderr = sanitize_output(&output.stderr);
        let exit_code = output.status.code().unwrap_or(-1);

        tracing::debug!(
            "Command completed: exit={}, stdout_len={}, stderr_len={}",
            exit_code,
            stdout.len(),
            stderr.len()
        );

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "Command exited with code {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
                exit_code,
                stdout,
                stderr
            ));
        }

        Ok(json!({
            "stdout": stdout,
            "stderr": stderr,
        }))
    }
}
