use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Identifier of a project in IRIDA
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Projects sort numerically when both identifiers are numbers, so that
/// project 2 comes before project 10.
impl Ord for ProjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ProjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Identifier of a sample in IRIDA, unique across projects
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(pub String);

impl SampleId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of an IRIDA workflow (one per SISTR pipeline release)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// QC status attached to a single SISTR prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QcStatus {
    Pass,
    Warning,
    Fail,
}

impl QcStatus {
    /// Ordinal rank used for sorting; a missing result ranks below all of these
    #[must_use]
    pub fn numerical(self) -> u8 {
        match self {
            Self::Pass => 3,
            Self::Warning => 2,
            Self::Fail => 1,
        }
    }

    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl std::fmt::Display for QcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warning => write!(f, "WARNING"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Whether a sample carries a reportable serovar backed by a PASS result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportableStatus {
    Pass,
    Fail,
}

impl ReportableStatus {
    #[must_use]
    pub fn numerical(self) -> u8 {
        match self {
            Self::Pass => 1,
            Self::Fail => 0,
        }
    }
}

impl std::fmt::Display for ReportableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ids_sort_numerically() {
        let mut ids = vec![
            ProjectId::new("10"),
            ProjectId::new("2"),
            ProjectId::new("abc"),
            ProjectId::new("1"),
        ];
        ids.sort();
        let ids: Vec<&str> = ids.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10", "abc"]);
    }

    #[test]
    fn test_qc_status_rank() {
        assert!(QcStatus::Pass.numerical() > QcStatus::Warning.numerical());
        assert!(QcStatus::Warning.numerical() > QcStatus::Fail.numerical());
        assert!(QcStatus::Fail.numerical() > 0);
    }

    #[test]
    fn test_qc_status_rejects_unknown_values() {
        assert_eq!(
            serde_json::from_str::<QcStatus>("\"WARNING\"").unwrap(),
            QcStatus::Warning
        );
        assert!(serde_json::from_str::<QcStatus>("\"MAYBE\"").is_err());
    }
}
