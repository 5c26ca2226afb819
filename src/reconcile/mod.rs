//! SISTR result reconciliation.
//!
//! A sample can have several SISTR results: one automated run per sequencing
//! pair, plus runs shared with a project or launched by the user, possibly
//! from different workflow releases. This module decides which single result
//! represents each sample:
//!
//! - [`merge`]: the pairwise rule choosing between the current result and a candidate
//! - [`submission`]: turns one analysis submission into a [`SampleResult`]
//! - [`collector`]: picks the best automated result for every sample of a project
//! - [`engine`]: gathers projects, folds shared and user results in, and
//!   returns the reconciled project → sample → result mapping
//!
//! ## Merge rule
//!
//! 1. Candidates from workflows outside the requested set are rejected
//! 2. Any result beats no result, and a result is never replaced by no result
//! 3. PASS beats WARNING and FAIL regardless of age
//! 4. Between two PASS results, or two non-PASS results, the newer submission
//!    wins; equal timestamps keep the current result
//!
//! ## Example
//!
//! ```rust,no_run
//! use irida_sistr_results::irida::memory::InMemoryGateway;
//! use irida_sistr_results::core::types::ProjectId;
//! use irida_sistr_results::reconcile::engine::ReconciliationEngine;
//!
//! let gateway = InMemoryGateway::new();
//! let engine = ReconciliationEngine::new(&gateway);
//! let results = engine
//!     .get_results_for_projects(&[ProjectId::new("1")], None)
//!     .unwrap();
//!
//! for (project_id, project) in &results.projects {
//!     println!("{project_id}: {} samples", project.samples.len());
//! }
//! ```
//!
//! [`SampleResult`]: crate::core::sample::SampleResult

pub mod collector;
pub mod engine;
pub mod merge;
pub mod submission;

use thiserror::Error;

use crate::core::prediction::PredictionError;
use crate::core::types::ProjectId;
use crate::irida::GatewayError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Could not get rel={rel} from links of {resource}")]
    MissingResourceLink { rel: String, resource: String },

    #[error("Could not parse SISTR predictions for {submission}: {source}")]
    PredictionParse {
        submission: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not get SISTR predictions for {submission}")]
    MissingPrediction { submission: String },

    #[error(
        "Unpaired files were found for analysis submission {submission}. \
         SISTR results from unpaired files are not currently supported"
    )]
    UnsupportedUnpairedInput { submission: String },

    #[error("Project {0} was requested more than once")]
    DuplicateProject(ProjectId),

    #[error("IRIDA request failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl ReconcileError {
    pub(crate) fn missing_link(rel: &str, resource: impl Into<String>) -> Self {
        Self::MissingResourceLink {
            rel: rel.to_string(),
            resource: resource.into(),
        }
    }

    pub(crate) fn from_prediction(error: PredictionError, submission: String) -> Self {
        match error {
            PredictionError::Parse(source) => Self::PredictionParse { submission, source },
            PredictionError::Missing => Self::MissingPrediction { submission },
        }
    }

    /// Broken prediction payloads only disqualify the submission they belong to
    pub fn is_prediction_error(&self) -> bool {
        matches!(
            self,
            Self::PredictionParse { .. } | Self::MissingPrediction { .. }
        )
    }

    /// Errors that abort the evaluation of a single sample
    pub fn is_sample_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResourceLink { .. } | Self::UnsupportedUnpairedInput { .. }
        )
    }
}
