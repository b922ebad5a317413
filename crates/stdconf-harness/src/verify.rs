//! Verdicts and verdict summaries.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::case::{CaseId, ParameterSet};

/// Pass/fail result of running one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Passed,
    Failed,
}

/// First failure encountered in a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseFailure {
    pub parameter_index: usize,
    pub parameter_set: ParameterSet,
    /// `HarnessError::kind()` of the failure.
    pub kind: &'static str,
    pub message: String,
    /// Rendered expected/actual diff, for value observations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Result of verifying a single case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub case_id: CaseId,
    pub clause: String,
    pub status: VerdictStatus,
    /// Parameter sets invoked, including a failing one.
    pub parameter_sets_run: usize,
    pub observations_checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CaseFailure>,
}

impl Verdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == VerdictStatus::Passed
    }

    #[must_use]
    pub fn with_failure(mut self, failure: CaseFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Selected cases left unrun after a fail-fast stop.
    pub not_run: Vec<CaseId>,
    pub verdicts: Vec<Verdict>,
}

impl VerdictSummary {
    #[must_use]
    pub fn from_verdicts(verdicts: Vec<Verdict>, not_run: Vec<CaseId>) -> Self {
        let total = verdicts.len();
        let passed = verdicts.iter().filter(|v| v.passed()).count();
        Self {
            total,
            passed,
            failed: total - passed,
            not_run,
            verdicts,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// SHA-256 over every verdict's id, status, counts and failure, in run
    /// order. Equal for reruns with the same seed.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for v in &self.verdicts {
            hasher.update(v.case_id.as_str().as_bytes());
            hasher.update([u8::from(v.passed())]);
            hasher.update((v.parameter_sets_run as u64).to_le_bytes());
            hasher.update((v.observations_checked as u64).to_le_bytes());
            if let Some(failure) = &v.failure {
                hasher.update((failure.parameter_index as u64).to_le_bytes());
                hasher.update(failure.message.as_bytes());
            }
            hasher.update([0]);
        }
        for id in &self.not_run {
            hasher.update(id.as_str().as_bytes());
            hasher.update([0]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// The first failing verdict, in run order.
    #[must_use]
    pub fn first_failure(&self) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| !v.passed())
    }
}
