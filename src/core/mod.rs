//! Core data types for SISTR result reconciliation.
//!
//! - [`SampleResult`]: the result chosen for one sample, or a "no result" placeholder
//! - [`Prediction`]: a single SISTR serovar prediction with its QC status
//! - [`resource`]: the IRIDA resources (projects, samples, submissions, ...) and
//!   the link relations used to navigate between them
//! - [`ProjectId`], [`SampleId`], [`WorkflowId`], [`QcStatus`]: identifier and
//!   classification types
//!
//! [`SampleResult`]: sample::SampleResult
//! [`Prediction`]: prediction::Prediction
//! [`ProjectId`]: types::ProjectId
//! [`SampleId`]: types::SampleId
//! [`WorkflowId`]: types::WorkflowId
//! [`QcStatus`]: types::QcStatus

pub mod prediction;
pub mod resource;
pub mod sample;
pub mod types;
