//! Placeholder substitution over step arguments.
//!
//! An argument value participates only if it is a string whose entirety is
//! `{token}`. Tokens with the `_output` suffix reference an earlier step's
//! output in run memory and are replaced by the full stored value, whatever
//! its kind. Tokens without the suffix pass through unchanged as literal
//! text, as do embedded `{...}` fragments inside longer strings.

use crate::plan::Memory;
use serde_json::{Map, Value};

const OUTPUT_SUFFIX: &str = "_output";

/// Failure to resolve an output reference.
///
/// Reaching this means the dependency check was bypassed: a well-formed
/// plan declares the referenced step in `dependencies`, which skips the
/// dependent before substitution is attempted. The error is fatal for the
/// step (it fails rather than being silently skipped).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not resolve placeholder '{{{token}}}': output of step '{step_id}' not found or unusable")]
pub struct SubstitutionError {
    /// The full token, e.g. `s1_output`.
    pub token: String,
    /// The referenced step id, e.g. `s1`.
    pub step_id: String,
}

/// The token inside a whole-value `{...}` string, if the value has that shape.
fn placeholder_token(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    if text.len() >= 2 && text.starts_with('{') && text.ends_with('}') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Rewrite `args`, replacing whole-value output references with the
/// referenced step's stored output.
pub fn substitute(
    args: &Map<String, Value>,
    memory: &Memory,
) -> Result<Map<String, Value>, SubstitutionError> {
    let mut resolved = args.clone();

    for (key, value) in args {
        let Some(token) = placeholder_token(value) else {
            continue;
        };
        let Some(step_id) = token.strip_suffix(OUTPUT_SUFFIX) else {
            // Not an output reference: left as literal text.
            continue;
        };

        if memory.is_usable(step_id) {
            let output = memory.get(step_id).cloned().unwrap_or(Value::Null);
            tracing::debug!(
                "Resolved placeholder '{}' using output from step '{}'",
                value,
                step_id
            );
            resolved.insert(key.clone(), output);
        } else {
            return Err(SubstitutionError {
                token: token.to_string(),
                step_id: step_id.to_string(),
            });
        }
    }

    Ok(resolved)
}
