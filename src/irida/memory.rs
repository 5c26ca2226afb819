use std::cell::Cell;
use std::collections::HashMap;

use crate::core::resource::{Analysis, Project, Sample, SequencingObject, Submission};
use crate::core::types::{ProjectId, SampleId};
use crate::irida::{GatewayError, ResourceGateway};

/// A gateway serving resources registered up front
///
/// Link-addressed resources (submissions, analyses, files, ...) are stored by
/// href, so fixtures must register every href their links point at.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    projects: Vec<Project>,
    samples: HashMap<ProjectId, Vec<Sample>>,
    pairs: HashMap<SampleId, Vec<SequencingObject>>,
    submissions: HashMap<String, Submission>,
    object_lists: HashMap<String, Vec<SequencingObject>>,
    analyses: HashMap<String, Analysis>,
    files: HashMap<String, String>,
    linked_samples: HashMap<String, Sample>,
    user_submissions: Vec<Submission>,
    shared_submissions: HashMap<ProjectId, Vec<Submission>>,
    requests: Cell<usize>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    fn record_request(&self) {
        self.requests.set(self.requests.get() + 1);
    }

    pub fn add_project(&mut self, project: Project) {
        self.samples.entry(project.identifier.clone()).or_default();
        self.projects.push(project);
    }

    pub fn add_sample(&mut self, project: &ProjectId, sample: Sample) {
        self.samples.entry(project.clone()).or_default().push(sample);
    }

    pub fn add_pair(&mut self, sample: &SampleId, pair: SequencingObject) {
        self.pairs.entry(sample.clone()).or_default().push(pair);
    }

    pub fn add_submission(&mut self, href: impl Into<String>, submission: Submission) {
        self.submissions.insert(href.into(), submission);
    }

    pub fn add_object_list(&mut self, href: impl Into<String>, objects: Vec<SequencingObject>) {
        self.object_lists.insert(href.into(), objects);
    }

    pub fn add_analysis(&mut self, href: impl Into<String>, analysis: Analysis) {
        self.analyses.insert(href.into(), analysis);
    }

    pub fn add_file(&mut self, href: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(href.into(), contents.into());
    }

    /// Register a sample reachable through a `sample` link
    pub fn add_linked_sample(&mut self, href: impl Into<String>, sample: Sample) {
        self.linked_samples.insert(href.into(), sample);
    }

    pub fn add_user_submission(&mut self, submission: Submission) {
        self.user_submissions.push(submission);
    }

    pub fn add_shared_submission(&mut self, project: &ProjectId, submission: Submission) {
        self.shared_submissions
            .entry(project.clone())
            .or_default()
            .push(submission);
    }

    fn lookup<T: Clone>(&self, map: &HashMap<String, T>, href: &str) -> Result<T, GatewayError> {
        self.record_request();
        map.get(href)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(href.to_string()))
    }
}

impl ResourceGateway for InMemoryGateway {
    fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        self.record_request();
        Ok(self.projects.clone())
    }

    fn get_project(&self, id: &ProjectId) -> Result<Project, GatewayError> {
        self.record_request();
        self.projects
            .iter()
            .find(|p| &p.identifier == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("project {id}")))
    }

    fn list_samples(&self, project: &ProjectId) -> Result<Vec<Sample>, GatewayError> {
        self.record_request();
        self.samples
            .get(project)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("samples of project {project}")))
    }

    fn list_sequencing_pairs(
        &self,
        sample: &SampleId,
    ) -> Result<Vec<SequencingObject>, GatewayError> {
        self.record_request();
        Ok(self.pairs.get(sample).cloned().unwrap_or_default())
    }

    fn get_submission(&self, href: &str) -> Result<Submission, GatewayError> {
        self.lookup(&self.submissions, href)
    }

    fn list_sequencing_objects(&self, href: &str) -> Result<Vec<SequencingObject>, GatewayError> {
        self.lookup(&self.object_lists, href)
    }

    fn get_analysis(&self, href: &str) -> Result<Analysis, GatewayError> {
        self.lookup(&self.analyses, href)
    }

    fn get_prediction_file(&self, href: &str) -> Result<String, GatewayError> {
        self.lookup(&self.files, href)
    }

    fn get_sample(&self, href: &str) -> Result<Sample, GatewayError> {
        self.lookup(&self.linked_samples, href)
    }

    fn list_submissions_for_user(&self) -> Result<Vec<Submission>, GatewayError> {
        self.record_request();
        Ok(self.user_submissions.clone())
    }

    fn list_submissions_shared_to_project(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<Submission>, GatewayError> {
        self.record_request();
        Ok(self
            .shared_submissions
            .get(project)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_unknown_project_is_not_found() {
        let gateway = InMemoryGateway::new();
        let err = gateway.get_project(&ProjectId::new("1")).unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
        assert_eq!(gateway.request_count(), 1);
    }

    #[test]
    fn test_samples_and_pairs() {
        let mut gateway = InMemoryGateway::new();
        let project = Project::new("1", "project1");
        let sample = Sample::new("11", "sample11", DateTime::<Utc>::default());
        gateway.add_project(project.clone());
        gateway.add_sample(&project.identifier, sample.clone());
        gateway.add_pair(&sample.identifier, SequencingObject::new("100"));

        assert_eq!(gateway.list_projects().unwrap(), vec![project.clone()]);
        assert_eq!(
            gateway.list_samples(&project.identifier).unwrap(),
            vec![sample.clone()]
        );
        assert_eq!(
            gateway.list_sequencing_pairs(&sample.identifier).unwrap().len(),
            1
        );
        assert!(gateway
            .list_sequencing_pairs(&SampleId::new("unknown"))
            .unwrap()
            .is_empty());
    }
}
