//! Rendering reconciled results as tables.
//!
//! A [`ResultsWriter`] receives a header, one row per sample and a closing
//! provenance record. [`write_results`] drives a writer over a
//! [`ReconciledResults`] in report order: projects by ascending numeric id,
//! then samples by QC status (PASS first, missing results last), sample name
//! and sample creation date.
//!
//! - [`tsv`]: tab-delimited output, full or short column layout
//! - [`json`]: an array of row objects keyed by column title

pub mod json;
pub mod tsv;

use std::cmp::Reverse;
use std::fmt;
use std::io;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::prediction::SequenceType;
use crate::core::sample::SampleResult;
use crate::reconcile::engine::{ProjectResults, ReconciledResults};
use crate::workflow::WorkflowFilter;

pub use json::JsonWriter;
pub use tsv::TsvWriter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for a rendered results table
pub trait ResultsWriter {
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    fn write_header(&mut self, titles: &[&str]) -> Result<(), OutputError>;

    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    fn write_row(&mut self, cells: &[Cell]) -> Result<(), OutputError>;

    /// Write the provenance record and flush
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written or flushed.
    fn finalize(&mut self, provenance: &Provenance) -> Result<(), OutputError>;
}

/// One value of a results table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(u64),
    Float(f64),
    Empty,
}

impl Cell {
    fn text(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Empty, |v| Self::Text(v.into()))
    }

    fn timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Empty, |t| {
            Self::Text(t.format(TIMESTAMP_FORMAT).to_string())
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Empty => Ok(()),
        }
    }
}

/// Columns available in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProjectId,
    ProjectName,
    SampleName,
    QcStatus,
    Serovar,
    SerovarAntigen,
    SerovarCgmlst,
    Serogroup,
    H1,
    H2,
    OAntigen,
    CgmlstSubspecies,
    CgmlstGenome,
    CgmlstMatchingAlleles,
    CgmlstPercentMatching,
    CgmlstSequenceType,
    MashSubspecies,
    MashSerovar,
    MashGenome,
    MashDistance,
    QcMessages,
    ReportableSerovarStatus,
    SubmissionUrl,
    SampleCreatedDate,
    SampleId,
    PairedId,
    SubmissionId,
    SubmissionCreatedDate,
    WorkflowVersion,
}

const FULL_COLUMNS: &[Column] = &[
    Column::ProjectId,
    Column::SampleName,
    Column::QcStatus,
    Column::Serovar,
    Column::SerovarAntigen,
    Column::SerovarCgmlst,
    Column::Serogroup,
    Column::H1,
    Column::H2,
    Column::OAntigen,
    Column::CgmlstSubspecies,
    Column::CgmlstGenome,
    Column::CgmlstMatchingAlleles,
    Column::CgmlstPercentMatching,
    Column::CgmlstSequenceType,
    Column::MashSubspecies,
    Column::MashSerovar,
    Column::MashGenome,
    Column::MashDistance,
    Column::QcMessages,
    Column::SubmissionUrl,
    Column::SampleCreatedDate,
    Column::SampleId,
    Column::PairedId,
    Column::SubmissionId,
    Column::SubmissionCreatedDate,
    Column::ProjectName,
    Column::ReportableSerovarStatus,
    Column::WorkflowVersion,
];

const SHORT_COLUMNS: &[Column] = &[
    Column::ProjectId,
    Column::SampleName,
    Column::QcStatus,
    Column::SampleCreatedDate,
    Column::Serovar,
    Column::SerovarAntigen,
    Column::SerovarCgmlst,
    Column::CgmlstMatchingAlleles,
    Column::CgmlstPercentMatching,
    Column::SubmissionUrl,
];

impl Column {
    /// Header title; the short layout names a few columns differently
    pub fn title(self, layout: Layout) -> &'static str {
        match (self, layout) {
            (Self::ProjectId, _) => "Project ID",
            (Self::ProjectName, _) => "Project Name",
            (Self::SampleName, _) => "Sample Name",
            (Self::QcStatus, _) => "QC Status",
            (Self::Serovar, _) => "Serovar (overall)",
            (Self::SerovarAntigen, _) => "Serovar (antigen)",
            (Self::SerovarCgmlst, _) => "Serovar (cgMLST)",
            (Self::Serogroup, _) => "Serogroup",
            (Self::H1, _) => "H1",
            (Self::H2, _) => "H2",
            (Self::OAntigen, _) => "O-antigen",
            (Self::CgmlstSubspecies, _) => "cgMLST Subspecies",
            (Self::CgmlstGenome, _) => "cgMLST Matching Genome",
            (Self::CgmlstMatchingAlleles, Layout::Full) => "Alleles Matching Genome",
            (Self::CgmlstMatchingAlleles, Layout::Short) => "cgMLST Alleles Matching",
            (Self::CgmlstPercentMatching, _) => "cgMLST Percent Matching",
            (Self::CgmlstSequenceType, _) => "cgMLST Sequence Type",
            (Self::MashSubspecies, _) => "Mash Subspecies",
            (Self::MashSerovar, _) => "Mash Serovar",
            (Self::MashGenome, _) => "Mash Matching Genome Name",
            (Self::MashDistance, _) => "Mash Distance",
            (Self::QcMessages, _) => "QC Messages",
            (Self::ReportableSerovarStatus, _) => "Reportable Serovar Status",
            (Self::SubmissionUrl, Layout::Full) => "IRIDA URL",
            (Self::SubmissionUrl, Layout::Short) => "IRIDA Analysis URL",
            (Self::SampleCreatedDate, Layout::Full) => "Sample Created Date",
            (Self::SampleCreatedDate, Layout::Short) => "Created Date",
            (Self::SampleId, _) => "IRIDA Sample Identifier",
            (Self::PairedId, _) => "IRIDA File Pair Identifier",
            (Self::SubmissionId, _) => "IRIDA Submission Identifier",
            (Self::SubmissionCreatedDate, _) => "IRIDA Analysis Date",
            (Self::WorkflowVersion, _) => "Workflow Version",
        }
    }
}

/// Column set of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Full,
    Short,
}

impl Layout {
    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Full => FULL_COLUMNS,
            Self::Short => SHORT_COLUMNS,
        }
    }

    pub fn titles(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.title(self)).collect()
    }
}

/// Builds table rows from sample results
pub struct RowFormatter<'a> {
    layout: Layout,
    irida_url: &'a str,
    workflows: &'a WorkflowFilter,
}

impl<'a> RowFormatter<'a> {
    pub fn new(layout: Layout, irida_url: &'a str, workflows: &'a WorkflowFilter) -> Self {
        Self {
            layout,
            irida_url,
            workflows,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn row(&self, project: &ProjectResults, result: &SampleResult) -> Vec<Cell> {
        self.layout
            .columns()
            .iter()
            .map(|&column| self.cell(column, project, result))
            .collect()
    }

    fn cell(&self, column: Column, project: &ProjectResults, result: &SampleResult) -> Cell {
        let prediction = result.prediction();
        let submission = result.submission();

        match column {
            Column::ProjectId => Cell::Text(project.project.identifier.to_string()),
            Column::ProjectName => Cell::Text(project.project.name.clone()),
            Column::SampleName => Cell::text(result.sample_name()),
            Column::QcStatus => Cell::Text(result.qc_label()),
            Column::Serovar => Cell::text(prediction.and_then(|p| p.serovar.as_deref())),
            Column::SerovarAntigen => {
                Cell::text(prediction.and_then(|p| p.serovar_antigen.as_deref()))
            }
            Column::SerovarCgmlst => Cell::text(prediction.map(|p| p.serovar_cgmlst_display())),
            Column::Serogroup => Cell::text(prediction.and_then(|p| p.serogroup.as_deref())),
            Column::H1 => Cell::text(prediction.and_then(|p| p.h1.as_deref())),
            Column::H2 => Cell::text(prediction.and_then(|p| p.h2.as_deref())),
            Column::OAntigen => Cell::text(prediction.and_then(|p| p.o_antigen.as_deref())),
            Column::CgmlstSubspecies => {
                Cell::text(prediction.and_then(|p| p.cgmlst_subspecies.as_deref()))
            }
            Column::CgmlstGenome => {
                Cell::text(prediction.and_then(|p| p.cgmlst_genome_match.as_deref()))
            }
            Column::CgmlstMatchingAlleles => prediction
                .and_then(|p| p.cgmlst_matching_alleles)
                .map_or(Cell::Empty, |n| Cell::Integer(u64::from(n))),
            Column::CgmlstPercentMatching => Cell::text(
                result
                    .cgmlst_matching_proportion()
                    .map(|p| format!("{:.1}%", p * 100.0)),
            ),
            Column::CgmlstSequenceType => {
                match prediction.and_then(|p| p.cgmlst_sequence_type.as_ref()) {
                    Some(SequenceType::Number(n)) => Cell::Integer(*n),
                    Some(SequenceType::Text(s)) => Cell::Text(s.clone()),
                    None => Cell::Empty,
                }
            }
            Column::MashSubspecies => {
                Cell::text(prediction.and_then(|p| p.mash_subspecies.as_deref()))
            }
            Column::MashSerovar => Cell::text(prediction.and_then(|p| p.mash_serovar.as_deref())),
            Column::MashGenome => Cell::text(prediction.and_then(|p| p.mash_genome.as_deref())),
            Column::MashDistance => prediction
                .and_then(|p| p.mash_distance)
                .map_or(Cell::Empty, Cell::Float),
            Column::QcMessages => Cell::text(prediction.and_then(|p| p.qc_messages.as_deref())),
            Column::ReportableSerovarStatus => {
                Cell::Text(result.reportable_serovar_status().to_string())
            }
            Column::SubmissionUrl => Cell::text(result.submission_url(self.irida_url)),
            Column::SampleCreatedDate => Cell::timestamp(result.sample_created_at()),
            Column::SampleId => Cell::text(result.sample_id().map(ToString::to_string)),
            Column::PairedId => Cell::text(result.paired_id()),
            Column::SubmissionId => Cell::text(submission.map(|s| s.submission_id.as_str())),
            Column::SubmissionCreatedDate => Cell::timestamp(result.created_at()),
            Column::WorkflowVersion => Cell::text(
                result
                    .workflow_id()
                    .map(|id| self.workflows.display_version(id)),
            ),
        }
    }
}

/// Who generated a report, against which IRIDA, and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub app_name: String,
    pub version: String,
    pub irida_url: String,
    pub username: String,
    pub generated_at: DateTime<Local>,
}

impl Provenance {
    /// Provenance for a report generated now by this program
    pub fn new(irida_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            irida_url: irida_url.into(),
            username: username.into(),
            generated_at: Local::now(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Results generated from {} version={} connecting to IRIDA={} as user={} on date={}",
            self.app_name,
            self.version,
            self.irida_url,
            self.username,
            self.generated_at.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Samples of a project in report order
pub fn sorted_samples(project: &ProjectResults) -> Vec<&SampleResult> {
    let mut samples: Vec<&SampleResult> = project.samples.values().collect();
    samples.sort_by(|a, b| {
        Reverse(a.qc_status_numerical())
            .cmp(&Reverse(b.qc_status_numerical()))
            .then_with(|| a.sample_name().cmp(&b.sample_name()))
            .then_with(|| a.sample_created_at().cmp(&b.sample_created_at()))
    });
    samples
}

/// Write every reconciled result through `writer`
///
/// # Errors
///
/// Returns the first error reported by the writer.
pub fn write_results<W: ResultsWriter + ?Sized>(
    writer: &mut W,
    results: &ReconciledResults,
    formatter: &RowFormatter<'_>,
    provenance: &Provenance,
) -> Result<usize, OutputError> {
    writer.write_header(&formatter.layout().titles())?;

    let mut rows = 0;
    // BTreeMap order on ProjectId is numeric
    for (project_id, project) in &results.projects {
        let samples = sorted_samples(project);
        debug!("Writing {} samples for project {project_id}", samples.len());
        for result in samples {
            writer.write_row(&formatter.row(project, result))?;
            rows += 1;
        }
    }

    writer.finalize(provenance)?;
    Ok(rows)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::types::{ProjectId, QcStatus, SampleId};

    /// Writer capturing everything it is given
    #[derive(Default)]
    struct Recording {
        header: Vec<String>,
        rows: Vec<Vec<Cell>>,
        finalized: bool,
    }

    impl ResultsWriter for Recording {
        fn write_header(&mut self, titles: &[&str]) -> Result<(), OutputError> {
            self.header = titles.iter().map(ToString::to_string).collect();
            Ok(())
        }

        fn write_row(&mut self, cells: &[Cell]) -> Result<(), OutputError> {
            self.rows.push(cells.to_vec());
            Ok(())
        }

        fn finalize(&mut self, _provenance: &Provenance) -> Result<(), OutputError> {
            self.finalized = true;
            Ok(())
        }
    }

    fn provenance() -> Provenance {
        Provenance::new("http://localhost/irida", "admin")
    }

    #[test]
    fn test_rows_in_report_order() {
        let results = results(&[
            ("10", vec![completed("101", "b", QcStatus::Pass)]),
            (
                "2",
                vec![
                    missing("21", "a"),
                    completed("22", "c", QcStatus::Fail),
                    completed("23", "b", QcStatus::Pass),
                    completed("24", "a", QcStatus::Pass),
                    completed("25", "z", QcStatus::Warning),
                ],
            ),
        ]);

        let workflows = WorkflowFilter::default();
        let formatter = RowFormatter::new(Layout::Short, "http://localhost/irida", &workflows);
        let mut writer = Recording::default();
        let rows = write_results(&mut writer, &results, &formatter, &provenance()).unwrap();

        assert_eq!(rows, 6);
        assert!(writer.finalized);
        let order: Vec<(String, String)> = writer
            .rows
            .iter()
            .map(|r| (r[0].to_string(), r[1].to_string()))
            .collect();
        let expected = [
            ("2", "a"),
            ("2", "b"),
            ("2", "z"),
            ("2", "c"),
            ("2", "a"),
            ("10", "b"),
        ];
        let expected: Vec<(String, String)> = expected
            .iter()
            .map(|(p, s)| (p.to_string(), s.to_string()))
            .collect();
        assert_eq!(order, expected);
        assert_eq!(writer.rows[4][2], Cell::Text("MISSING".to_string()));
    }

    #[test]
    fn test_full_row_values() {
        let results = results(&[("1", vec![completed("11", "s11", QcStatus::Pass)])]);
        let project = &results.projects[&ProjectId::new("1")];
        let result = &project.samples[&SampleId::new("11")];

        let workflows = WorkflowFilter::default();
        let formatter = RowFormatter::new(Layout::Full, "http://localhost/irida/", &workflows);
        let row = formatter.row(project, result);
        let titles = Layout::Full.titles();
        let value = |title: &str| {
            let index = titles.iter().position(|t| *t == title).unwrap();
            row[index].clone()
        };

        assert_eq!(row.len(), titles.len());
        assert_eq!(value("Serovar (cgMLST)"), Cell::Text("None".to_string()));
        assert_eq!(value("Alleles Matching Genome"), Cell::Integer(330));
        assert_eq!(value("cgMLST Percent Matching"), Cell::Text("100.0%".to_string()));
        assert_eq!(value("Mash Distance"), Cell::Float(0.0012));
        assert_eq!(
            value("IRIDA URL"),
            Cell::Text("http://localhost/irida/analysis/sub11".to_string())
        );
        assert_eq!(
            value("IRIDA Analysis Date"),
            Cell::Text("2020-09-13 12:26:40".to_string())
        );
        assert_eq!(value("IRIDA File Pair Identifier"), Cell::Text("pair11".to_string()));
        assert_eq!(value("Reportable Serovar Status"), Cell::Text("PASS".to_string()));
        assert_eq!(value("Workflow Version"), Cell::Text("0.3".to_string()));
        assert_eq!(value("Project Name"), Cell::Text("project1".to_string()));
    }

    #[test]
    fn test_missing_row_leaves_prediction_cells_empty() {
        let results = results(&[("1", vec![missing("11", "s11")])]);
        let project = &results.projects[&ProjectId::new("1")];
        let result = &project.samples[&SampleId::new("11")];

        let workflows = WorkflowFilter::default();
        let formatter = RowFormatter::new(Layout::Short, "http://localhost/irida", &workflows);
        let row = formatter.row(project, result);

        assert_eq!(row[0], Cell::Text("1".to_string()));
        assert_eq!(row[1], Cell::Text("s11".to_string()));
        assert_eq!(row[2], Cell::Text("MISSING".to_string()));
        assert!(row[4..].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_short_titles() {
        assert_eq!(
            Layout::Short.titles(),
            vec![
                "Project ID",
                "Sample Name",
                "QC Status",
                "Created Date",
                "Serovar (overall)",
                "Serovar (antigen)",
                "Serovar (cgMLST)",
                "cgMLST Alleles Matching",
                "cgMLST Percent Matching",
                "IRIDA Analysis URL",
            ]
        );
    }

    #[test]
    fn test_short_row_has_allele_count() {
        let results = results(&[("1", vec![completed("11", "s11", QcStatus::Warning)])]);
        let project = &results.projects[&ProjectId::new("1")];
        let result = &project.samples[&SampleId::new("11")];

        let workflows = WorkflowFilter::default();
        let formatter = RowFormatter::new(Layout::Short, "http://localhost/irida", &workflows);
        let row = formatter.row(project, result);

        assert_eq!(row[7], Cell::Integer(330));
        assert_eq!(row[8], Cell::Text("100.0%".to_string()));
    }

    #[test]
    fn test_provenance_line() {
        let line = provenance().to_string();
        assert!(line.starts_with("Results generated from irida-sistr-results version="));
        assert!(line.contains("connecting to IRIDA=http://localhost/irida as user=admin on date="));
    }

    #[test]
    fn test_cell_json_values() {
        let cells = vec![
            Cell::Text("a".to_string()),
            Cell::Integer(3),
            Cell::Float(0.5),
            Cell::Empty,
        ];
        assert_eq!(
            serde_json::to_string(&cells).unwrap(),
            r#"["a",3,0.5,null]"#
        );
    }
}
