//! Resource shapes returned by the IRIDA REST API.
//!
//! Every resource carries a list of `{rel, href}` links; navigation between
//! resources happens exclusively by following those links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{ProjectId, SampleId, WorkflowId};

/// Link relation from a sequencing object to its SISTR submission
pub const REL_SISTR_ANALYSIS: &str = "analysis/sistr";
/// Link relation from a submission to its paired-end inputs
pub const REL_INPUT_PAIRED: &str = "input/paired";
/// Link relation from a submission to its single-end inputs
pub const REL_INPUT_UNPAIRED: &str = "input/unpaired";
/// Link relation from a submission to its analysis
pub const REL_ANALYSIS: &str = "analysis";
/// Link relation from an analysis to the SISTR predictions file
pub const REL_SISTR_PREDICTIONS: &str = "outputFile/sistr-predictions";
/// Link relation from a sequencing object to its sample
pub const REL_SAMPLE: &str = "sample";
/// Link relation from any resource to itself
pub const REL_SELF: &str = "self";

/// Analysis state of a completed submission
pub const STATE_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// The `links` array of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(pub Vec<Link>);

impl Links {
    /// Href for a relation; when a relation repeats, the last one wins
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|l| l.rel == rel)
            .map(|l| l.href.as_str())
    }

    pub fn has(&self, rel: &str) -> bool {
        self.0.iter().any(|l| l.rel == rel)
    }

    pub fn push(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        self.0.push(Link::new(rel, href));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub identifier: ProjectId,

    pub name: String,

    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub links: Links,
}

impl Project {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: ProjectId::new(identifier),
            name: name.into(),
            created_date: None,
            links: Links::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub identifier: SampleId,

    pub sample_name: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_date: DateTime<Utc>,

    #[serde(default)]
    pub links: Links,
}

impl Sample {
    pub fn new(
        identifier: impl Into<String>,
        sample_name: impl Into<String>,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: SampleId::new(identifier),
            sample_name: sample_name.into(),
            created_date,
            links: Links::default(),
        }
    }
}

/// A sequencing object; for `/pairs` endpoints this is a paired-end read set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencingObject {
    pub identifier: String,

    #[serde(default)]
    pub links: Links,
}

impl SequencingObject {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            links: Links::default(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.push(rel, href);
        self
    }
}

/// One execution record of an analysis workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub identifier: String,

    #[serde(default)]
    pub name: String,

    pub analysis_state: String,

    pub workflow_id: WorkflowId,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_date: DateTime<Utc>,

    #[serde(default)]
    pub links: Links,
}

impl Submission {
    pub fn is_completed(&self) -> bool {
        self.analysis_state == STATE_COMPLETED
    }

    /// Reference used when reporting problems with this submission
    pub fn reference(&self) -> String {
        self.links
            .get(REL_SELF)
            .map_or_else(|| format!("submission {}", self.identifier), str::to_string)
    }
}

/// Analysis outputs of a completed submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub links: Links,
}
