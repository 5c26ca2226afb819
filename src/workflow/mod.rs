//! Workflow version handling.
//!
//! IRIDA identifies each SISTR pipeline release by an opaque workflow id. Users
//! select releases by version ("0.3") or by id; [`WorkflowFilter::resolve`]
//! turns those selectors into a set of ids and [`WorkflowFilter::accepts`]
//! tests candidate results against it.
//!
//! ```rust
//! use irida_sistr_results::workflow::{WorkflowFilter, WorkflowTable};
//!
//! let filter = WorkflowFilter::new(WorkflowTable::sistr());
//! let allowed = filter.resolve(&["0.3"]).unwrap();
//! assert_eq!(allowed.len(), 1);
//! ```

pub mod table;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::types::WorkflowId;

pub use table::{WorkflowEntry, WorkflowTable};

/// A set of accepted workflow ids; empty means every workflow is accepted
pub type WorkflowSet = BTreeSet<WorkflowId>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Invalid workflow version or id: '{0}'")]
    InvalidSelector(String),
}

/// Resolves workflow selectors against a version table
#[derive(Debug, Clone)]
pub struct WorkflowFilter {
    table: WorkflowTable,
}

impl WorkflowFilter {
    pub fn new(table: WorkflowTable) -> Self {
        Self { table }
    }

    /// Convert version strings or workflow ids into workflow ids
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidSelector` for the first selector that is
    /// neither a known version nor a known id.
    pub fn resolve<S: AsRef<str>>(&self, selectors: &[S]) -> Result<WorkflowSet, WorkflowError> {
        selectors
            .iter()
            .map(|selector| {
                let selector = selector.as_ref();
                if let Some(id) = self.table.id_for_version(selector) {
                    return Ok(id.clone());
                }
                let id = WorkflowId::new(selector);
                if self.table.contains_id(&id) {
                    Ok(id)
                } else {
                    Err(WorkflowError::InvalidSelector(selector.to_string()))
                }
            })
            .collect()
    }

    /// True when no filter is set or the filter contains `workflow_id`
    pub fn accepts(workflow_id: &WorkflowId, allowed: Option<&WorkflowSet>) -> bool {
        match allowed {
            Some(set) if !set.is_empty() => set.contains(workflow_id),
            _ => true,
        }
    }

    /// Version string for display, falling back to the raw id
    pub fn display_version(&self, workflow_id: &WorkflowId) -> String {
        self.table
            .version_of(workflow_id)
            .map_or_else(|| workflow_id.to_string(), str::to_string)
    }
}

impl Default for WorkflowFilter {
    fn default() -> Self {
        Self::new(WorkflowTable::sistr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V01: &str = "e559af58-a560-4bbd-997e-808bfbe026e2";
    const V02: &str = "e8f9cc61-3264-48c6-81d9-02d9e84bccc7";

    #[test]
    fn test_resolve_version() {
        let ids = WorkflowFilter::default().resolve(&["0.1"]).unwrap();
        assert_eq!(ids, WorkflowSet::from([WorkflowId::new(V01)]));
    }

    #[test]
    fn test_resolve_id() {
        let ids = WorkflowFilter::default().resolve(&[V01]).unwrap();
        assert_eq!(ids, WorkflowSet::from([WorkflowId::new(V01)]));
    }

    #[test]
    fn test_resolve_version_and_id_agree() {
        let filter = WorkflowFilter::default();
        assert_eq!(filter.resolve(&["0.2"]), filter.resolve(&[V02]));
    }

    #[test]
    fn test_resolve_id_and_version() {
        let ids = WorkflowFilter::default().resolve(&[V01, "0.2"]).unwrap();
        assert_eq!(
            ids,
            WorkflowSet::from([WorkflowId::new(V01), WorkflowId::new(V02)])
        );
    }

    #[test]
    fn test_resolve_invalid_version() {
        let err = WorkflowFilter::default().resolve(&["0.1x"]).unwrap_err();
        assert_eq!(err, WorkflowError::InvalidSelector("0.1x".to_string()));

        assert!(WorkflowFilter::default()
            .resolve(&["not-a-real-version"])
            .is_err());
    }

    #[test]
    fn test_resolve_invalid_id() {
        let selector = format!("X{V02}");
        assert!(WorkflowFilter::default().resolve(&[selector]).is_err());
    }

    #[test]
    fn test_accepts() {
        let id = WorkflowId::new(V01);
        assert!(WorkflowFilter::accepts(&id, None));
        assert!(WorkflowFilter::accepts(&id, Some(&WorkflowSet::new())));
        assert!(WorkflowFilter::accepts(
            &id,
            Some(&WorkflowSet::from([WorkflowId::new(V01)]))
        ));
        assert!(!WorkflowFilter::accepts(
            &id,
            Some(&WorkflowSet::from([WorkflowId::new(V02)]))
        ));
    }

    #[test]
    fn test_display_version() {
        let filter = WorkflowFilter::default();
        assert_eq!(filter.display_version(&WorkflowId::new(V02)), "0.2");
        assert_eq!(filter.display_version(&WorkflowId::new("other")), "other");
    }
}
