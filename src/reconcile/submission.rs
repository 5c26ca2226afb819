use std::sync::Arc;

use tracing::debug;

use crate::core::prediction::parse_predictions;
use crate::core::resource::{
    Submission, REL_ANALYSIS, REL_INPUT_PAIRED, REL_INPUT_UNPAIRED, REL_SAMPLE,
    REL_SISTR_PREDICTIONS,
};
use crate::core::sample::{ReportableSerovars, SampleResult, SubmissionInfo};
use crate::irida::ResourceGateway;
use crate::reconcile::ReconcileError;

/// Builds a [`SampleResult`] from a completed SISTR submission
pub struct SubmissionResolver<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    reportable_serovars: Arc<ReportableSerovars>,
}

impl<'a, G: ResourceGateway + ?Sized> SubmissionResolver<'a, G> {
    pub fn new(gateway: &'a G, reportable_serovars: Arc<ReportableSerovars>) -> Self {
        Self {
            gateway,
            reportable_serovars,
        }
    }

    /// Follow a submission's links to its predictions, inputs and sample
    ///
    /// A paired input without a `sample` link produces a result without a
    /// sample rather than an error.
    ///
    /// # Errors
    ///
    /// - `MissingResourceLink` if the submission lacks `input/paired` or
    ///   `analysis`, or the analysis lacks its predictions file
    /// - `UnsupportedUnpairedInput` if single-end inputs are attached
    /// - `PredictionParse` / `MissingPrediction` for unusable prediction files
    /// - `Gateway` if any request fails
    pub fn resolve(&self, submission: &Submission) -> Result<SampleResult, ReconcileError> {
        let reference = submission.reference();

        let paired_href = submission
            .links
            .get(REL_INPUT_PAIRED)
            .ok_or_else(|| ReconcileError::missing_link(REL_INPUT_PAIRED, &reference))?;
        let analysis_href = submission
            .links
            .get(REL_ANALYSIS)
            .ok_or_else(|| ReconcileError::missing_link(REL_ANALYSIS, &reference))?;

        if let Some(unpaired_href) = submission.links.get(REL_INPUT_UNPAIRED) {
            let unpaired = self.gateway.list_sequencing_objects(unpaired_href)?;
            if !unpaired.is_empty() {
                return Err(ReconcileError::UnsupportedUnpairedInput {
                    submission: reference,
                });
            }
        }

        let paired = self.gateway.list_sequencing_objects(paired_href)?;

        let analysis = self.gateway.get_analysis(analysis_href)?;
        let predictions_href = analysis
            .links
            .get(REL_SISTR_PREDICTIONS)
            .ok_or_else(|| ReconcileError::missing_link(REL_SISTR_PREDICTIONS, analysis_href))?;
        let contents = self.gateway.get_prediction_file(predictions_href)?;
        let prediction = parse_predictions(&contents)
            .map_err(|e| ReconcileError::from_prediction(e, reference.clone()))?;

        let first_pair = paired.first();
        let sample = match first_pair.and_then(|p| p.links.get(REL_SAMPLE)) {
            Some(sample_href) => Some(self.gateway.get_sample(sample_href)?),
            None => {
                debug!("No sample link on paired input of {reference}");
                None
            }
        };

        let result = SampleResult::completed(
            sample,
            prediction,
            SubmissionInfo::from(submission),
            Arc::clone(&self.reportable_serovars),
        );

        Ok(match first_pair {
            Some(pair) => result.with_paired_id(&pair.identifier),
            None => result,
        })
    }
}
