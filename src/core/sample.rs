use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;

use crate::core::prediction::Prediction;
use crate::core::resource::{Sample, Submission};
use crate::core::types::{QcStatus, ReportableStatus, SampleId, WorkflowId};

/// QC label shown for samples without a SISTR result
pub const MISSING_QC_LABEL: &str = "MISSING";

/// Serovars a lab considers reportable, in the order they were configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportableSerovars(IndexSet<String>);

impl ReportableSerovars {
    pub fn new<I, S>(serovars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(serovars.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, serovar: &str) -> bool {
        self.0.contains(serovar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The parts of a submission a result needs to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionInfo {
    pub submission_id: String,
    pub workflow_id: WorkflowId,
    pub created_at: DateTime<Utc>,
}

impl From<&Submission> for SubmissionInfo {
    fn from(submission: &Submission) -> Self {
        Self {
            submission_id: submission.identifier.clone(),
            workflow_id: submission.workflow_id.clone(),
            created_at: submission.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SistrOutcome {
    prediction: Prediction,
    submission: SubmissionInfo,
}

/// The SISTR result chosen to represent one sample, or a "no result" placeholder.
///
/// Results are never modified once they enter a reconciliation map; a better
/// candidate replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// Absent when a submission's paired input carried no sample link
    sample: Option<Sample>,
    outcome: Option<SistrOutcome>,
    paired_id: Option<String>,
    reportable_serovars: Arc<ReportableSerovars>,
}

impl SampleResult {
    /// A placeholder for a sample without a completed SISTR prediction
    pub fn no_result(sample: Option<Sample>, reportable_serovars: Arc<ReportableSerovars>) -> Self {
        Self {
            sample,
            outcome: None,
            paired_id: None,
            reportable_serovars,
        }
    }

    pub fn completed(
        sample: Option<Sample>,
        prediction: Prediction,
        submission: SubmissionInfo,
        reportable_serovars: Arc<ReportableSerovars>,
    ) -> Self {
        Self {
            sample,
            outcome: Some(SistrOutcome {
                prediction,
                submission,
            }),
            paired_id: None,
            reportable_serovars,
        }
    }

    #[must_use]
    pub fn with_paired_id(mut self, paired_id: impl Into<String>) -> Self {
        self.paired_id = Some(paired_id.into());
        self
    }

    /// Attach `sample` when the result was built without one
    #[must_use]
    pub fn with_sample_if_missing(mut self, sample: &Sample) -> Self {
        if self.sample.is_none() {
            self.sample = Some(sample.clone());
        }
        self
    }

    pub fn sample(&self) -> Option<&Sample> {
        self.sample.as_ref()
    }

    pub fn sample_id(&self) -> Option<&SampleId> {
        self.sample.as_ref().map(|s| &s.identifier)
    }

    pub fn sample_name(&self) -> Option<&str> {
        self.sample.as_ref().map(|s| s.sample_name.as_str())
    }

    pub fn sample_created_at(&self) -> Option<DateTime<Utc>> {
        self.sample.as_ref().map(|s| s.created_date)
    }

    pub fn has_result(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.outcome.as_ref().map(|o| &o.prediction)
    }

    pub fn submission(&self) -> Option<&SubmissionInfo> {
        self.outcome.as_ref().map(|o| &o.submission)
    }

    pub fn paired_id(&self) -> Option<&str> {
        self.paired_id.as_deref()
    }

    pub fn workflow_id(&self) -> Option<&WorkflowId> {
        self.submission().map(|s| &s.workflow_id)
    }

    /// Creation time of the submission that produced this result
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.submission().map(|s| s.created_at)
    }

    pub fn qc_status(&self) -> Option<QcStatus> {
        self.prediction().map(|p| p.qc_status)
    }

    /// QC status as shown in reports, `MISSING` when there is no result
    pub fn qc_label(&self) -> String {
        self.qc_status()
            .map_or_else(|| MISSING_QC_LABEL.to_string(), |s| s.to_string())
    }

    /// PASS > WARNING > FAIL > no result
    pub fn qc_status_numerical(&self) -> u8 {
        self.qc_status().map_or(0, QcStatus::numerical)
    }

    pub fn reportable_serovars(&self) -> &ReportableSerovars {
        &self.reportable_serovars
    }

    pub fn is_reportable_serovar(&self) -> bool {
        self.prediction().is_some_and(|p| {
            p.qc_status.is_pass()
                && p.serovar
                    .as_deref()
                    .is_some_and(|s| self.reportable_serovars.contains(s))
        })
    }

    pub fn reportable_serovar_status(&self) -> ReportableStatus {
        if self.is_reportable_serovar() {
            ReportableStatus::Pass
        } else {
            ReportableStatus::Fail
        }
    }

    pub fn reportable_status_numerical(&self) -> u8 {
        self.reportable_serovar_status().numerical()
    }

    pub fn cgmlst_matching_proportion(&self) -> Option<f64> {
        self.prediction()
            .and_then(Prediction::cgmlst_matching_proportion)
    }

    /// Link to the analysis page of the submission in the IRIDA web UI
    pub fn submission_url(&self, irida_base_url: &str) -> Option<String> {
        self.submission().map(|s| {
            format!(
                "{}/analysis/{}",
                irida_base_url.trim_end_matches('/'),
                s.submission_id
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reportable() -> Arc<ReportableSerovars> {
        Arc::new(ReportableSerovars::new(["serovar1", "serovar2", "serovar3"]))
    }

    fn sample() -> Sample {
        Sample::new("1", "sample1", DateTime::<Utc>::default())
    }

    fn result(serovar: &str, qc_status: QcStatus) -> SampleResult {
        SampleResult::completed(
            Some(sample()),
            Prediction::new(qc_status).with_serovar(serovar),
            SubmissionInfo {
                submission_id: "10".to_string(),
                workflow_id: WorkflowId::new("92ecf046-ee09-4271-b849-7a82625d6b60"),
                created_at: DateTime::<Utc>::default(),
            },
            reportable(),
        )
    }

    #[test]
    fn test_reportable_serovar_status_success() {
        let info = result("serovar1", QcStatus::Pass);
        assert!(info.is_reportable_serovar());
        assert_eq!(info.reportable_serovar_status(), ReportableStatus::Pass);
        assert_eq!(info.reportable_status_numerical(), 1);
    }

    #[test]
    fn test_reportable_serovar_status_fail_qc() {
        let info = result("serovar1", QcStatus::Fail);
        assert!(!info.is_reportable_serovar());
        assert_eq!(info.reportable_serovar_status(), ReportableStatus::Fail);
        assert_eq!(info.reportable_status_numerical(), 0);
    }

    #[test]
    fn test_reportable_serovar_status_warn_qc() {
        let info = result("serovar1", QcStatus::Warning);
        assert!(!info.is_reportable_serovar());
        assert_eq!(info.reportable_status_numerical(), 0);
    }

    #[test]
    fn test_reportable_serovar_status_missing() {
        let info = SampleResult::no_result(None, reportable());
        assert!(!info.is_reportable_serovar());
        assert_eq!(info.reportable_serovar_status(), ReportableStatus::Fail);
        assert_eq!(info.reportable_status_numerical(), 0);
    }

    #[test]
    fn test_reportable_serovar_status_unlisted_serovar() {
        let info = result("serovar4", QcStatus::Pass);
        assert!(!info.is_reportable_serovar());
        assert_eq!(info.reportable_serovar_status(), ReportableStatus::Fail);
    }

    #[test]
    fn test_no_result_has_no_outcome() {
        let info = SampleResult::no_result(Some(sample()), reportable()).with_paired_id("5");
        assert!(!info.has_result());
        assert!(info.prediction().is_none());
        assert!(info.submission().is_none());
        assert_eq!(info.qc_label(), "MISSING");
        assert_eq!(info.qc_status_numerical(), 0);
        assert_eq!(info.paired_id(), Some("5"));
        assert_eq!(info.sample_id(), Some(&SampleId::new("1")));
    }

    #[test]
    fn test_qc_status_numerical_ordering() {
        let pass = result("x", QcStatus::Pass).qc_status_numerical();
        let warn = result("x", QcStatus::Warning).qc_status_numerical();
        let fail = result("x", QcStatus::Fail).qc_status_numerical();
        let missing = SampleResult::no_result(None, reportable()).qc_status_numerical();
        assert!(pass > warn && warn > fail && fail > missing);
    }

    #[test]
    fn test_submission_url() {
        let info = result("serovar1", QcStatus::Pass);
        assert_eq!(
            info.submission_url("http://localhost/irida/").as_deref(),
            Some("http://localhost/irida/analysis/10")
        );
        assert_eq!(
            info.submission_url("http://localhost/irida").as_deref(),
            Some("http://localhost/irida/analysis/10")
        );
    }

    #[test]
    fn test_with_sample_if_missing_keeps_existing_sample() {
        let other = Sample::new("2", "sample2", DateTime::<Utc>::default());
        let info = result("serovar1", QcStatus::Pass).with_sample_if_missing(&other);
        assert_eq!(info.sample_name(), Some("sample1"));

        let bare = SampleResult::no_result(None, reportable()).with_sample_if_missing(&other);
        assert_eq!(bare.sample_name(), Some("sample2"));
    }
}
