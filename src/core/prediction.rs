use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::QcStatus;

/// Number of loci in the SISTR cgMLST scheme
pub const CGMLST_TOTAL_ALLELES: u32 = 330;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Failed to parse SISTR predictions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("SISTR predictions file is empty")]
    Missing,
}

/// cgMLST sequence type; SISTR reports it as a number but older runs used strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceType {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One SISTR serovar prediction (an entry of `sistr-predictions.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub serovar: Option<String>,

    #[serde(default)]
    pub serovar_antigen: Option<String>,

    /// Null when cgMLST could not assign a serovar
    #[serde(default)]
    pub serovar_cgmlst: Option<String>,

    #[serde(default)]
    pub serogroup: Option<String>,

    #[serde(default)]
    pub h1: Option<String>,

    #[serde(default)]
    pub h2: Option<String>,

    #[serde(default)]
    pub o_antigen: Option<String>,

    pub qc_status: QcStatus,

    #[serde(default)]
    pub qc_messages: Option<String>,

    #[serde(default)]
    pub cgmlst_subspecies: Option<String>,

    #[serde(default)]
    pub cgmlst_genome_match: Option<String>,

    #[serde(default)]
    pub cgmlst_matching_alleles: Option<u32>,

    #[serde(default, rename = "cgmlst_ST")]
    pub cgmlst_sequence_type: Option<SequenceType>,

    #[serde(default)]
    pub mash_subspecies: Option<String>,

    #[serde(default)]
    pub mash_serovar: Option<String>,

    #[serde(default)]
    pub mash_genome: Option<String>,

    #[serde(default)]
    pub mash_distance: Option<f64>,
}

impl Prediction {
    /// Minimal prediction with only a QC status set
    pub fn new(qc_status: QcStatus) -> Self {
        Self {
            serovar: None,
            serovar_antigen: None,
            serovar_cgmlst: None,
            serogroup: None,
            h1: None,
            h2: None,
            o_antigen: None,
            qc_status,
            qc_messages: None,
            cgmlst_subspecies: None,
            cgmlst_genome_match: None,
            cgmlst_matching_alleles: None,
            cgmlst_sequence_type: None,
            mash_subspecies: None,
            mash_serovar: None,
            mash_genome: None,
            mash_distance: None,
        }
    }

    #[must_use]
    pub fn with_serovar(mut self, serovar: impl Into<String>) -> Self {
        self.serovar = Some(serovar.into());
        self
    }

    /// cgMLST serovar, rendering a missing assignment as "None"
    pub fn serovar_cgmlst_display(&self) -> &str {
        self.serovar_cgmlst.as_deref().unwrap_or("None")
    }

    /// Fraction of the cgMLST scheme matched by the closest genome
    pub fn cgmlst_matching_proportion(&self) -> Option<f64> {
        self.cgmlst_matching_alleles
            .map(|n| f64::from(n) / f64::from(CGMLST_TOTAL_ALLELES))
    }

    pub fn cgmlst_matching_total_alleles(&self) -> Option<String> {
        self.cgmlst_matching_alleles
            .map(|n| format!("{n}/{CGMLST_TOTAL_ALLELES}"))
    }
}

/// Parse the contents of a SISTR predictions file, keeping the first prediction
///
/// # Errors
///
/// Returns `PredictionError::Missing` for blank, `null` or empty-array content,
/// and `PredictionError::Parse` for anything that is not a list of predictions
/// (including QC statuses other than PASS, WARNING or FAIL).
pub fn parse_predictions(text: &str) -> Result<Prediction, PredictionError> {
    if text.trim().is_empty() {
        return Err(PredictionError::Missing);
    }

    let predictions: Option<Vec<Prediction>> = serde_json::from_str(text)?;
    predictions
        .and_then(|p| p.into_iter().next())
        .ok_or(PredictionError::Missing)
}
