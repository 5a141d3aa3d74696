//! Per-run step output store.

use serde_json::Value;
use std::collections::HashMap;

/// Mapping from step id to that step's output.
///
/// Exactly one `Memory` exists per execution run; it is owned by the engine
/// call and never shared across runs. `Value::Null` marks a step whose
/// output is unusable (it failed or was skipped).
///
/// # Invariants
/// - An entry is `Null` iff the corresponding step failed or was skipped
/// - A successful step's entry holds exactly the tool's returned value
#[derive(Debug, Default)]
pub struct Memory {
    entries: HashMap<String, Value>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful step's output.
    pub fn record_output(&mut self, id: impl Into<String>, output: Value) {
        self.entries.insert(id.into(), output);
    }

    /// Record a failed or skipped step. Dependents of `id` will be skipped.
    pub fn record_unusable(&mut self, id: impl Into<String>) {
        self.entries.insert(id.into(), Value::Null);
    }

    /// The stored value for a step id, if the step has been reached.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    /// Whether the step has an entry at all (usable or not).
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether the step produced a usable output.
    pub fn is_usable(&self, id: &str) -> bool {
        matches!(self.entries.get(id), Some(value) if !value.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_is_usable() {
        let mut memory = Memory::new();
        memory.record_output("s1", json!("file contents"));
        assert!(memory.contains("s1"));
        assert!(memory.is_usable("s1"));
        assert_eq!(memory.get("s1"), Some(&json!("file contents")));
    }

    #[test]
    fn test_unusable_entry_is_null() {
        let mut memory = Memory::new();
        memory.record_unusable("s1");
        assert!(memory.contains("s1"));
        assert!(!memory.is_usable("s1"));
        assert_eq!(memory.get("s1"), Some(&Value::Null));
    }

    #[test]
    fn test_unknown_id() {
        let memory = Memory::new();
        assert!(!memory.contains("s1"));
        assert!(!memory.is_usable("s1"));
        assert_eq!(memory.get("s1"), None);
    }
}
