//! Access to IRIDA resources.
//!
//! The reconciliation core only talks to IRIDA through the [`ResourceGateway`]
//! trait. Two implementations are provided:
//!
//! - [`IridaClient`]: blocking HTTP client authenticating with the OAuth2
//!   password grant
//! - [`InMemoryGateway`]: resources held in memory, for tests and offline use
//!
//! [`IridaClient`]: client::IridaClient
//! [`InMemoryGateway`]: memory::InMemoryGateway

pub mod client;
pub mod memory;

use thiserror::Error;

use crate::core::resource::{Analysis, Project, Sample, SequencingObject, Submission};
use crate::core::types::{ProjectId, SampleId};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Authentication with IRIDA failed: {0}")]
    Auth(String),

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Read-only access to the IRIDA resources needed to gather SISTR results
///
/// Methods taking an `href` follow a link taken from another resource.
pub trait ResourceGateway {
    /// All projects visible to the user
    fn list_projects(&self) -> Result<Vec<Project>, GatewayError>;

    fn get_project(&self, id: &ProjectId) -> Result<Project, GatewayError>;

    fn list_samples(&self, project: &ProjectId) -> Result<Vec<Sample>, GatewayError>;

    /// Paired-end sequencing objects of a sample
    fn list_sequencing_pairs(&self, sample: &SampleId)
        -> Result<Vec<SequencingObject>, GatewayError>;

    fn get_submission(&self, href: &str) -> Result<Submission, GatewayError>;

    /// Sequencing objects behind a submission's `input/paired` or `input/unpaired` link
    fn list_sequencing_objects(&self, href: &str) -> Result<Vec<SequencingObject>, GatewayError>;

    fn get_analysis(&self, href: &str) -> Result<Analysis, GatewayError>;

    /// Raw contents of an analysis output file
    fn get_prediction_file(&self, href: &str) -> Result<String, GatewayError>;

    fn get_sample(&self, href: &str) -> Result<Sample, GatewayError>;

    /// SISTR submissions launched by the user
    fn list_submissions_for_user(&self) -> Result<Vec<Submission>, GatewayError>;

    /// SISTR submissions shared with a project
    fn list_submissions_shared_to_project(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<Submission>, GatewayError>;
}
