//! Dependency eligibility checks.
//!
//! A step may only run when every declared dependency has produced a usable
//! output in run memory. Checks stop at the first offender, in declared
//! order, so skip reasons are deterministic and reproducible.

use crate::plan::Memory;

/// Why a dependency blocks its dependent from running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyIssue {
    /// The dependency id has no memory entry: the step was never reached,
    /// or is declared after its dependent.
    #[error("Dependency '{0}' result not found")]
    NotFound(String),

    /// The dependency ran but left no usable output (it failed or was
    /// itself skipped).
    #[error("Dependency '{0}' failed/skipped")]
    Unusable(String),
}

/// Check every dependency in declared order against run memory.
///
/// Returns the first unsatisfied dependency, or `Ok(())` when all are
/// usable. An empty dependency list is always satisfied.
pub fn check(dependencies: &[String], memory: &Memory) -> Result<(), DependencyIssue> {
    for dep_id in dependencies {
        match memory.get(dep_id) {
            None => return Err(DependencyIssue::NotFound(dep_id.clone())),
            Some(value) if value.is_null() => {
                return Err(DependencyIssue::Unusable(dep_id.clone()))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Whether all dependencies are satisfied.
pub fn is_satisfied(dependencies: &[String], memory: &Memory) -> bool {
    check(dependencies, memory).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deps(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_dependencies_always_satisfied() {
        let memory = Memory::new();
        assert!(is_satisfied(&[], &memory));
    }

    #[test]
    fn test_missing_entry_reported_as_not_found() {
        let memory = Memory::new();
        let err = check(&deps(&["s1"]), &memory).unwrap_err();
        assert_eq!(err, DependencyIssue::NotFound("s1".to_string()));
        assert_eq!(err.to_string(), "Dependency 's1' result not found");
    }

    #[test]
    fn test_null_entry_reported_as_unusable() {
        let mut memory = Memory::new();
        memory.record_unusable("s1");
        let err = check(&deps(&["s1"]), &memory).unwrap_err();
        assert_eq!(err, DependencyIssue::Unusable("s1".to_string()));
        assert_eq!(err.to_string(), "Dependency 's1' failed/skipped");
    }

    #[test]
    fn test_first_offender_in_declared_order() {
        let mut memory = Memory::new();
        memory.record_output("ok", json!("value"));
        memory.record_unusable("bad");

        // "bad" is listed before "absent": it must be the reported offender.
        let err = check(&deps(&["ok", "bad", "absent"]), &memory).unwrap_err();
        assert_eq!(err, DependencyIssue::Unusable("bad".to_string()));

        let err = check(&deps(&["absent", "bad"]), &memory).unwrap_err();
        assert_eq!(err, DependencyIssue::NotFound("absent".to_string()));
    }

    #[test]
    fn test_all_usable() {
        let mut memory = Memory::new();
        memory.record_output("s1", json!("a"));
        memory.record_output("s2", json!(["b"]));
        assert!(check(&deps(&["s1", "s2"]), &memory).is_ok());
    }
}
