use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::resource::{Project, Submission};
use crate::core::sample::{ReportableSerovars, SampleResult};
use crate::core::types::{ProjectId, QcStatus, SampleId};
use crate::irida::ResourceGateway;
use crate::reconcile::collector::ProjectResultCollector;
use crate::reconcile::merge::{choose, Choice};
use crate::reconcile::submission::SubmissionResolver;
use crate::reconcile::ReconcileError;
use crate::workflow::{WorkflowFilter, WorkflowSet};

/// Configuration for the reconciliation engine
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Fold in SISTR results shared with the requested projects
    pub include_shared_results: bool,
    /// Fold in SISTR results the user launched themselves
    pub include_user_results: bool,
    /// Let user results replace samples that already have a result
    pub update_existing_with_user_results: bool,
    pub reportable_serovars: Arc<ReportableSerovars>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            include_shared_results: true,
            include_user_results: false,
            update_existing_with_user_results: true,
            reportable_serovars: Arc::new(ReportableSerovars::default()),
        }
    }
}

/// Reconciled results of one project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectResults {
    pub project: Project,
    pub samples: BTreeMap<SampleId, SampleResult>,
}

/// Result of reconciliation: project → sample → chosen result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledResults {
    pub projects: BTreeMap<ProjectId, ProjectResults>,
}

impl ReconciledResults {
    pub fn get(&self, project: &ProjectId, sample: &SampleId) -> Option<&SampleResult> {
        self.projects
            .get(project)
            .and_then(|p| p.samples.get(sample))
    }

    /// Counts of samples per QC status across all projects
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary {
            projects: self.projects.len(),
            ..ResultSummary::default()
        };

        for result in self.projects.values().flat_map(|p| p.samples.values()) {
            summary.samples += 1;
            match result.qc_status() {
                Some(QcStatus::Pass) => summary.pass += 1,
                Some(QcStatus::Warning) => summary.warning += 1,
                Some(QcStatus::Fail) => summary.fail += 1,
                None => summary.missing += 1,
            }
        }

        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub projects: usize,
    pub samples: usize,
    pub pass: usize,
    pub warning: usize,
    pub fail: usize,
    pub missing: usize,
}

/// Reconciles automated, shared and user SISTR results across projects
pub struct ReconciliationEngine<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    config: ReconcileConfig,
}

impl<'a, G: ResourceGateway + ?Sized> ReconciliationEngine<'a, G> {
    /// Create a new engine with default configuration
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            config: ReconcileConfig::default(),
        }
    }

    /// Create a new engine with custom configuration
    pub fn with_config(gateway: &'a G, config: ReconcileConfig) -> Self {
        Self { gateway, config }
    }

    /// Reconciled results for every project visible to the user
    ///
    /// # Errors
    ///
    /// See [`Self::get_results_for_projects`].
    pub fn get_results_for_all_projects(
        &self,
        allowed: Option<&WorkflowSet>,
    ) -> Result<ReconciledResults, ReconcileError> {
        let project_ids: Vec<ProjectId> = self
            .gateway
            .list_projects()?
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        info!("Found {} projects", project_ids.len());
        self.get_results_for_projects(&project_ids, allowed)
    }

    /// Reconciled results for exactly the requested projects
    ///
    /// Each call starts from empty state, so repeated calls against the same
    /// IRIDA data give identical results.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::DuplicateProject` (before any request is made)
    /// if a project id is repeated, and `ReconcileError::Gateway` if any
    /// project cannot be loaded. No partial results are returned.
    pub fn get_results_for_projects(
        &self,
        project_ids: &[ProjectId],
        allowed: Option<&WorkflowSet>,
    ) -> Result<ReconciledResults, ReconcileError> {
        let mut seen = HashSet::new();
        for id in project_ids {
            if !seen.insert(id) {
                return Err(ReconcileError::DuplicateProject(id.clone()));
            }
        }

        let collector =
            ProjectResultCollector::new(self.gateway, Arc::clone(&self.config.reportable_serovars));

        let mut results = ReconciledResults::default();
        for id in project_ids {
            let project = self.gateway.get_project(id)?;
            info!("Loading SISTR results for project id={id}, name={}", project.name);
            let samples = collector.collect(id, allowed)?;
            results
                .projects
                .insert(id.clone(), ProjectResults { project, samples });
        }

        let index = sample_index(&results);

        if self.config.include_shared_results {
            for id in project_ids {
                let submissions = self.gateway.list_submissions_shared_to_project(id)?;
                debug!("{} SISTR submissions shared with project {id}", submissions.len());
                for candidate in self.resolve_candidates(submissions, allowed)? {
                    fold_candidate(&mut results, &index, candidate, allowed, true);
                }
            }
        }

        if self.config.include_user_results {
            let submissions = self.gateway.list_submissions_for_user()?;
            debug!("{} SISTR submissions launched by the user", submissions.len());
            for candidate in self.resolve_candidates(submissions, allowed)? {
                fold_candidate(
                    &mut results,
                    &index,
                    candidate,
                    allowed,
                    self.config.update_existing_with_user_results,
                );
            }
        }

        Ok(results)
    }

    /// Resolve the completed, accepted submissions of a batch
    ///
    /// Submissions that cannot be turned into a result are logged and dropped;
    /// only request failures abort.
    fn resolve_candidates(
        &self,
        submissions: Vec<Submission>,
        allowed: Option<&WorkflowSet>,
    ) -> Result<Vec<SampleResult>, ReconcileError> {
        let resolver =
            SubmissionResolver::new(self.gateway, Arc::clone(&self.config.reportable_serovars));

        let mut candidates = Vec::new();
        for submission in submissions {
            if !submission.is_completed() {
                debug!(
                    "Skipping incomplete SISTR submission [id={}]",
                    submission.identifier
                );
                continue;
            }
            if !WorkflowFilter::accepts(&submission.workflow_id, allowed) {
                debug!(
                    "Skipping SISTR submission [id={}] from workflow {}",
                    submission.identifier, submission.workflow_id
                );
                continue;
            }

            match resolver.resolve(&submission) {
                Ok(candidate) => candidates.push(candidate),
                Err(ReconcileError::Gateway(e)) => return Err(ReconcileError::Gateway(e)),
                Err(e) => warn!("{e}"),
            }
        }

        Ok(candidates)
    }
}

/// sample id → projects (among those requested) containing the sample
fn sample_index(results: &ReconciledResults) -> HashMap<SampleId, Vec<ProjectId>> {
    let mut index: HashMap<SampleId, Vec<ProjectId>> = HashMap::new();
    for (project_id, project) in &results.projects {
        for sample_id in project.samples.keys() {
            index
                .entry(sample_id.clone())
                .or_default()
                .push(project_id.clone());
        }
    }
    index
}

/// Merge a shared or user candidate into every project holding its sample
fn fold_candidate(
    results: &mut ReconciledResults,
    index: &HashMap<SampleId, Vec<ProjectId>>,
    candidate: SampleResult,
    allowed: Option<&WorkflowSet>,
    replace_existing: bool,
) {
    let Some(sample_id) = candidate.sample_id() else {
        debug!("Discarding SISTR result without a sample");
        return;
    };
    let Some(project_ids) = index.get(sample_id) else {
        debug!("Discarding SISTR result for sample_id={sample_id} outside the requested projects");
        return;
    };

    for project_id in project_ids {
        let Some(samples) = results.projects.get_mut(project_id).map(|p| &mut p.samples) else {
            continue;
        };
        let Some(current) = samples.get(sample_id) else {
            continue;
        };

        if !replace_existing && current.has_result() {
            warn!(
                "sample_name={}, sample_id={sample_id} already has SISTR results, will not update",
                current.sample_name().unwrap_or_default()
            );
            continue;
        }

        if choose(current, &candidate, allowed) == Choice::Candidate {
            debug!("Replacing SISTR result for sample_id={sample_id} in project {project_id}");
            samples.insert(sample_id.clone(), candidate.clone());
        }
    }
}
