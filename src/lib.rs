//! # irida-sistr-results
//!
//! A library for compiling SISTR serotyping results from an IRIDA instance into
//! one reconciled table.
//!
//! IRIDA runs SISTR automatically on every sequencing pair uploaded to a
//! project, and users can launch or share further SISTR analyses. A single
//! sample therefore often has several results, possibly from different SISTR
//! releases and with different QC outcomes.
//!
//! `irida-sistr-results` picks one result per sample and exports the table.
//!
//! ## Features
//!
//! - **QC-aware selection**: PASS results win over WARNING and FAIL
//! - **Recency**: among equally good results the newest analysis wins
//! - **Workflow filtering**: restrict results to chosen SISTR releases
//! - **Shared and user results**: fold in analyses outside the automated runs
//! - **Reportable serovars**: flag PASS results whose serovar is on a lab list
//!
//! ## Example
//!
//! ```rust,no_run
//! use irida_sistr_results::{IridaClient, ConnectionSettings, ProjectId, ReconciliationEngine};
//! use std::time::Duration;
//!
//! let settings = ConnectionSettings {
//!     base_url: "http://localhost:8080/irida".to_string(),
//!     client_id: "client".to_string(),
//!     client_secret: "secret".to_string(),
//!     username: "admin".to_string(),
//!     password: "password".to_string(),
//!     timeout: Duration::from_secs(600),
//! };
//! let client = IridaClient::connect(&settings).unwrap();
//!
//! let engine = ReconciliationEngine::new(&client);
//! let results = engine
//!     .get_results_for_projects(&[ProjectId::new("1")], None)
//!     .unwrap();
//!
//! let summary = results.summary();
//! println!("{} samples, {} PASS", summary.samples, summary.pass);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: IRIDA resources, SISTR predictions and per-sample results
//! - [`irida`]: Access to the IRIDA REST API, plus an in-memory stand-in
//! - [`workflow`]: SISTR workflow versions and workflow filtering
//! - [`reconcile`]: Choosing one result per sample
//! - [`output`]: Tab-delimited and JSON tables
//! - [`config`]: Config file loading
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod irida;
pub mod output;
pub mod reconcile;
pub mod workflow;

// Re-export commonly used types for convenience
pub use crate::core::sample::{ReportableSerovars, SampleResult};
pub use crate::core::types::*;
pub use crate::irida::client::{ConnectionSettings, IridaClient};
pub use crate::irida::ResourceGateway;
pub use crate::reconcile::engine::{ReconcileConfig, ReconciledResults, ReconciliationEngine};
pub use crate::workflow::{WorkflowFilter, WorkflowSet};
