//! IRIDA fixtures for integration tests.
//!
//! Builds an [`InMemoryGateway`] whose resources are wired together through
//! the same link relations IRIDA uses.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};

use irida_sistr_results::core::resource::{
    Analysis, Links, Project, Sample, SequencingObject, Submission, REL_ANALYSIS,
    REL_INPUT_PAIRED, REL_INPUT_UNPAIRED, REL_SAMPLE, REL_SELF, REL_SISTR_ANALYSIS,
    REL_SISTR_PREDICTIONS,
};
use irida_sistr_results::core::types::{ProjectId, SampleId, WorkflowId};
use irida_sistr_results::irida::memory::InMemoryGateway;

pub const V01: &str = "e559af58-a560-4bbd-997e-808bfbe026e2";
pub const V02: &str = "e8f9cc61-3264-48c6-81d9-02d9e84bccc7";
pub const V03: &str = "92ecf046-ee09-4271-b849-7a82625d6b60";

/// Description of one SISTR analysis submission
#[derive(Debug, Clone)]
pub struct SubmissionFixture {
    pub id: String,
    pub sample: String,
    pub qc: String,
    pub created: i64,
    pub workflow: String,
    pub state: String,
    pub unpaired: bool,
    pub sample_link: bool,
    pub predictions: Option<String>,
    /// Link relation left off the submission or its analysis
    pub missing_link: Option<&'static str>,
}

impl SubmissionFixture {
    /// A completed SISTR 0.3 submission on `sample`
    pub fn new(id: &str, sample: &str, qc: &str, created: i64) -> Self {
        Self {
            id: id.to_string(),
            sample: sample.to_string(),
            qc: qc.to_string(),
            created,
            workflow: V03.to_string(),
            state: "COMPLETED".to_string(),
            unpaired: false,
            sample_link: true,
            predictions: None,
            missing_link: None,
        }
    }

    pub fn workflow(mut self, workflow: &str) -> Self {
        self.workflow = workflow.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    pub fn unpaired(mut self) -> Self {
        self.unpaired = true;
        self
    }

    pub fn without_sample_link(mut self) -> Self {
        self.sample_link = false;
        self
    }

    /// Leave out one of `input/paired`, `analysis` or `outputFile/sistr-predictions`
    pub fn without_link(mut self, rel: &'static str) -> Self {
        self.missing_link = Some(rel);
        self
    }

    fn has_link(&self, rel: &str) -> bool {
        self.missing_link != Some(rel)
    }

    /// Replace the prediction file contents
    pub fn predictions(mut self, text: &str) -> Self {
        self.predictions = Some(text.to_string());
        self
    }

    pub fn href(&self) -> String {
        format!("http://irida/api/analysisSubmissions/{}", self.id)
    }

    pub fn pair_id(&self) -> String {
        format!("pair-{}", self.id)
    }
}

pub struct IridaFixture {
    pub gateway: InMemoryGateway,
}

impl IridaFixture {
    pub fn new() -> Self {
        Self {
            gateway: InMemoryGateway::new(),
        }
    }

    pub fn project(&mut self, id: &str) -> &mut Self {
        self.gateway
            .add_project(Project::new(id, format!("project{id}")));
        self
    }

    pub fn sample(&mut self, project: &str, id: &str) -> &mut Self {
        self.gateway
            .add_sample(&ProjectId::new(project), sample(id));
        self
    }

    /// A sequencing pair of `sample` that SISTR never ran on
    pub fn pair_without_analysis(&mut self, sample_id: &str, pair_id: &str) -> &mut Self {
        self.gateway
            .add_pair(&SampleId::new(sample_id), SequencingObject::new(pair_id));
        self
    }

    /// Register a submission and everything its links point at
    pub fn submission(&mut self, fixture: &SubmissionFixture) -> Submission {
        let href = fixture.href();
        let paired_href = format!("{href}/sequenceFiles/pairs");
        let unpaired_href = format!("{href}/sequenceFiles/unpaired");
        let analysis_href = format!("{href}/analysis");
        let predictions_href = format!("{analysis_href}/sistr-predictions");
        let sample_href = format!("http://irida/api/samples/{}", fixture.sample);

        let mut links = Links::default();
        links.push(REL_SELF, href.clone());
        for (rel, target) in [
            (REL_INPUT_PAIRED, &paired_href),
            (REL_INPUT_UNPAIRED, &unpaired_href),
            (REL_ANALYSIS, &analysis_href),
        ] {
            if fixture.has_link(rel) {
                links.push(rel, target.clone());
            }
        }

        let mut pair = SequencingObject::new(fixture.pair_id());
        if fixture.sample_link {
            pair = pair.with_link(REL_SAMPLE, sample_href.clone());
        }
        self.gateway.add_object_list(paired_href, vec![pair]);

        let unpaired = if fixture.unpaired {
            vec![SequencingObject::new(format!("single-{}", fixture.id))]
        } else {
            Vec::new()
        };
        self.gateway.add_object_list(unpaired_href, unpaired);

        let mut analysis = Analysis::default();
        if fixture.has_link(REL_SISTR_PREDICTIONS) {
            analysis
                .links
                .push(REL_SISTR_PREDICTIONS, predictions_href.clone());
        }
        self.gateway.add_analysis(analysis_href, analysis);

        let predictions = fixture
            .predictions
            .clone()
            .unwrap_or_else(|| predictions(&fixture.qc, "Enteritidis"));
        self.gateway.add_file(predictions_href, predictions);
        self.gateway.add_linked_sample(sample_href, sample(&fixture.sample));

        let submission = Submission {
            identifier: fixture.id.clone(),
            name: format!("SISTRTyper_{}", fixture.id),
            analysis_state: fixture.state.clone(),
            workflow_id: WorkflowId::new(fixture.workflow.as_str()),
            created_date: Utc.timestamp_opt(fixture.created, 0).unwrap(),
            links,
        };
        self.gateway.add_submission(href, submission.clone());
        submission
    }

    /// An automated run on its own sequencing pair of the fixture's sample
    pub fn automated(&mut self, fixture: SubmissionFixture) -> &mut Self {
        self.submission(&fixture);
        let pair = SequencingObject::new(fixture.pair_id())
            .with_link(REL_SISTR_ANALYSIS, fixture.href());
        self.gateway.add_pair(&SampleId::new(fixture.sample.as_str()), pair);
        self
    }

    /// A submission shared with `project`
    pub fn shared(&mut self, project: &str, fixture: SubmissionFixture) -> &mut Self {
        let submission = self.submission(&fixture);
        self.gateway
            .add_shared_submission(&ProjectId::new(project), submission);
        self
    }

    /// A submission launched by the user
    pub fn user(&mut self, fixture: SubmissionFixture) -> &mut Self {
        let submission = self.submission(&fixture);
        self.gateway.add_user_submission(submission);
        self
    }
}

pub fn sample(id: &str) -> Sample {
    Sample::new(
        id,
        format!("sample{id}"),
        Utc.timestamp_opt(1_500_000_000, 0).unwrap(),
    )
}

/// Contents of a SISTR predictions file with one prediction
pub fn predictions(qc: &str, serovar: &str) -> String {
    format!(
        r#"[{{
            "serovar": "{serovar}",
            "serovar_antigen": "{serovar}",
            "serovar_cgmlst": null,
            "serogroup": "D1",
            "h1": "g,m",
            "h2": "-",
            "o_antigen": "1,9,12",
            "qc_status": "{qc}",
            "qc_messages": "",
            "cgmlst_subspecies": "enterica",
            "cgmlst_genome_match": "SRR1002850",
            "cgmlst_matching_alleles": 317,
            "cgmlst_ST": 1468400426,
            "mash_subspecies": "enterica",
            "mash_serovar": "{serovar}",
            "mash_genome": "SRR1002850",
            "mash_distance": 0.00061
        }}]"#
    )
}

pub fn project_ids(ids: &[&str]) -> Vec<ProjectId> {
    ids.iter().map(|id| ProjectId::new(*id)).collect()
}
