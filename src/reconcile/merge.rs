use crate::core::sample::SampleResult;
use crate::workflow::{WorkflowFilter, WorkflowSet};

/// Outcome of comparing the current result for a sample against a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Current,
    Candidate,
}

/// Decide whether `candidate` should replace `current`
///
/// Timestamps are compared strictly, so when two equally good results were
/// created at the same instant the current one is kept and the order in which
/// candidates arrive decides the outcome.
#[must_use]
pub fn choose(
    current: &SampleResult,
    candidate: &SampleResult,
    allowed: Option<&WorkflowSet>,
) -> Choice {
    if allowed.is_some_and(|set| !set.is_empty()) {
        let accepted = candidate
            .workflow_id()
            .is_some_and(|id| WorkflowFilter::accepts(id, allowed));
        if !accepted {
            return Choice::Current;
        }
    }

    let (Some(current_qc), Some(candidate_qc)) = (current.qc_status(), candidate.qc_status())
    else {
        return if current.has_result() {
            Choice::Current
        } else {
            Choice::Candidate
        };
    };

    let newer = candidate.created_at() > current.created_at();
    match (current_qc.is_pass(), candidate_qc.is_pass()) {
        (false, true) => Choice::Candidate,
        (true, false) => Choice::Current,
        _ if newer => Choice::Candidate,
        _ => Choice::Current,
    }
}

/// Return whichever of `current` and `candidate` should represent the sample
#[must_use]
pub fn merge(
    current: SampleResult,
    candidate: SampleResult,
    allowed: Option<&WorkflowSet>,
) -> SampleResult {
    match choose(&current, &candidate, allowed) {
        Choice::Current => current,
        Choice::Candidate => candidate,
    }
}
