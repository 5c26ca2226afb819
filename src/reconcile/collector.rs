use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::core::resource::{Sample, SequencingObject, REL_SISTR_ANALYSIS};
use crate::core::sample::{ReportableSerovars, SampleResult};
use crate::core::types::{ProjectId, SampleId};
use crate::irida::ResourceGateway;
use crate::reconcile::merge::merge;
use crate::reconcile::submission::SubmissionResolver;
use crate::reconcile::ReconcileError;
use crate::workflow::{WorkflowFilter, WorkflowSet};

/// Chooses the automated SISTR result for every sample of a project
pub struct ProjectResultCollector<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    resolver: SubmissionResolver<'a, G>,
    reportable_serovars: Arc<ReportableSerovars>,
}

impl<'a, G: ResourceGateway + ?Sized> ProjectResultCollector<'a, G> {
    pub fn new(gateway: &'a G, reportable_serovars: Arc<ReportableSerovars>) -> Self {
        Self {
            gateway,
            resolver: SubmissionResolver::new(gateway, Arc::clone(&reportable_serovars)),
            reportable_serovars,
        }
    }

    /// One result per sample of `project`
    ///
    /// Samples whose submissions reference unpaired input, or are missing
    /// links, are logged and reported without a result; the rest of the
    /// project is still collected.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Gateway` if any IRIDA request fails.
    pub fn collect(
        &self,
        project: &ProjectId,
        allowed: Option<&WorkflowSet>,
    ) -> Result<BTreeMap<SampleId, SampleResult>, ReconcileError> {
        let samples = self.gateway.list_samples(project)?;
        info!("Examining {} samples in project {project}", samples.len());

        let mut results = BTreeMap::new();
        for sample in &samples {
            let result = match self.collect_sample(sample, allowed) {
                Ok(result) => result,
                Err(e) if e.is_sample_error() => {
                    error!(
                        "Skipping SISTR results for sample_name={}, sample_id={}: {e}",
                        sample.sample_name, sample.identifier
                    );
                    self.no_result(sample)
                }
                Err(e) => return Err(e),
            };
            results.insert(sample.identifier.clone(), result);
        }

        Ok(results)
    }

    fn collect_sample(
        &self,
        sample: &Sample,
        allowed: Option<&WorkflowSet>,
    ) -> Result<SampleResult, ReconcileError> {
        let pairs = self.gateway.list_sequencing_pairs(&sample.identifier)?;
        if pairs.is_empty() {
            debug!("No sequencing pairs for sample_id={}", sample.identifier);
            return Ok(self.no_result(sample));
        }

        let mut best: Option<SampleResult> = None;
        for pair in &pairs {
            let Some(href) = pair.links.get(REL_SISTR_ANALYSIS) else {
                debug!(
                    "No SISTR analysis for sample_id={}, pair_id={}",
                    sample.identifier, pair.identifier
                );
                best = best.or_else(|| Some(self.placeholder(sample, pair)));
                continue;
            };

            let submission = self.gateway.get_submission(href)?;
            if !submission.is_completed() {
                debug!(
                    "Skipping incomplete SISTR submission [id={}, state={}] for sample_id={}",
                    submission.identifier, submission.analysis_state, sample.identifier
                );
                best = best.or_else(|| Some(self.placeholder(sample, pair)));
                continue;
            }

            if !WorkflowFilter::accepts(&submission.workflow_id, allowed) {
                debug!(
                    "Skipping SISTR submission [id={}] from workflow {}",
                    submission.identifier, submission.workflow_id
                );
                best = best.or_else(|| Some(self.placeholder(sample, pair)));
                continue;
            }

            let candidate = match self.resolver.resolve(&submission) {
                Ok(candidate) => candidate.with_sample_if_missing(sample),
                Err(e) if e.is_prediction_error() => {
                    warn!("{e}");
                    best = best.or_else(|| Some(self.placeholder(sample, pair)));
                    continue;
                }
                Err(e) => return Err(e),
            };

            best = Some(match best {
                Some(current) => merge(current, candidate, allowed),
                None => candidate,
            });
        }

        Ok(best.unwrap_or_else(|| self.no_result(sample)))
    }

    fn no_result(&self, sample: &Sample) -> SampleResult {
        SampleResult::no_result(Some(sample.clone()), Arc::clone(&self.reportable_serovars))
    }

    fn placeholder(&self, sample: &Sample, pair: &SequencingObject) -> SampleResult {
        self.no_result(sample).with_paired_id(&pair.identifier)
    }
}
