//! Case driver: runs parameter sets through an operation and judges the
//! observations.

use serde_json::{Value, json};

use crate::assertion::{AssertionContext, assert_values, contains_float};
use crate::case::{CaseContext, ExpectedOutcome, Observation, ParameterSet, TestCase, Tolerance};
use crate::diff;
use crate::error::HarnessError;
use crate::registry::{CaseRegistry, Selection};
use crate::rng::{DEFAULT_SEED, derive_seed};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::{CaseFailure, Verdict, VerdictStatus, VerdictSummary};

/// Settings shared by every case in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Campaign name, used as the trace-id prefix.
    pub campaign: String,
    pub seed: u64,
    /// Continue with the remaining cases after a failing one.
    pub keep_going: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            campaign: String::from("stdconf"),
            seed: DEFAULT_SEED,
            keep_going: false,
        }
    }
}

/// Sequential, fail-fast case runner.
#[derive(Debug, Clone, Default)]
pub struct CaseDriver {
    config: RunConfig,
}

// A failing parameter set: the error plus a rendered diff when values differ.
struct Rejection {
    error: HarnessError,
    diff: Option<String>,
}

impl From<HarnessError> for Rejection {
    fn from(error: HarnessError) -> Self {
        Self { error, diff: None }
    }
}

impl CaseDriver {
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one case. Stops at the first failing parameter set.
    #[must_use]
    pub fn run_case(&self, case: &TestCase) -> Verdict {
        self.evaluate(case).0
    }

    /// Run one case, writing its events to `log`.
    pub fn run_case_logged(
        &self,
        case: &TestCase,
        log: &mut LogEmitter,
    ) -> Result<Verdict, HarnessError> {
        let (verdict, events) = self.evaluate(case);
        for entry in events {
            log.emit_entry(entry)?;
        }
        Ok(verdict)
    }

    /// Run the selected cases in order.
    ///
    /// Without `keep_going`, the first failing case stops the run and the
    /// remaining cases are reported as not run.
    pub fn run_all(
        &self,
        registry: &CaseRegistry,
        selection: &Selection,
        mut log: Option<&mut LogEmitter>,
    ) -> Result<VerdictSummary, HarnessError> {
        let cases = registry.select(selection)?;
        emit(
            &mut log,
            LogEntry::new("", LogLevel::Info, "run_start")
                .with_seed(self.config.seed)
                .with_details(json!({
                    "cases": cases.len(),
                    "keep_going": self.config.keep_going,
                })),
        )?;

        let mut verdicts = Vec::with_capacity(cases.len());
        let mut not_run = Vec::new();
        for (position, case) in cases.iter().enumerate() {
            let (verdict, events) = self.evaluate(case);
            for entry in events {
                emit(&mut log, entry)?;
            }
            let failed = !verdict.passed();
            verdicts.push(verdict);

            if failed && !self.config.keep_going {
                for skipped in &cases[position + 1..] {
                    emit(
                        &mut log,
                        LogEntry::new("", LogLevel::Info, "case_skip")
                            .with_case(skipped.id.as_str())
                            .with_outcome(Outcome::Skip)
                            .with_details(json!({ "reason": "fail_fast" })),
                    )?;
                    not_run.push(skipped.id.clone());
                }
                break;
            }
        }

        let summary = VerdictSummary::from_verdicts(verdicts, not_run);
        emit(
            &mut log,
            LogEntry::new(
                "",
                if summary.all_passed() {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                },
                "run_end",
            )
            .with_seed(self.config.seed)
            .with_outcome(if summary.all_passed() {
                Outcome::Pass
            } else {
                Outcome::Fail
            })
            .with_details(json!({
                "total": summary.total,
                "passed": summary.passed,
                "failed": summary.failed,
                "not_run": summary.not_run,
            })),
        )?;
        if let Some(log) = log.as_deref_mut() {
            log.flush()?;
        }
        Ok(summary)
    }

    fn evaluate(&self, case: &TestCase) -> (Verdict, Vec<LogEntry>) {
        let id = case.id.as_str();
        let mut events = vec![
            LogEntry::new("", LogLevel::Info, "case_start")
                .with_case(id)
                .with_details(json!({
                    "clause": case.clause,
                    "parameter_sets": case.parameter_sets.len(),
                })),
        ];
        let mut checked = 0;

        for (index, set) in case.parameter_sets.iter().enumerate() {
            let seed = derive_seed(self.config.seed, id, index);
            let mut ctx = CaseContext::new(seed);
            let result = (case.operation)(set, &mut ctx)
                .map_err(Rejection::from)
                .and_then(|observations| {
                    judge(case, set, index, &observations, &mut events, &mut checked)
                });

            match result {
                Ok(()) => events.push(
                    LogEntry::new("", LogLevel::Debug, "parameter_set_pass")
                        .with_case(id)
                        .with_parameter_set(index, set.to_string())
                        .with_seed(seed)
                        .with_outcome(Outcome::Pass),
                ),
                Err(rejection) => {
                    let mut entry = LogEntry::new("", LogLevel::Error, "case_fail")
                        .with_case(id)
                        .with_parameter_set(index, set.to_string())
                        .with_seed(seed)
                        .with_outcome(Outcome::Fail)
                        .with_details(json!({
                            "kind": rejection.error.kind(),
                            "message": rejection.error.to_string(),
                        }));
                    if let Some(expr) = failing_expr(&rejection.error) {
                        entry = entry.with_expr(expr);
                    }
                    events.push(entry);

                    let failure = CaseFailure {
                        parameter_index: index,
                        parameter_set: set.clone(),
                        kind: rejection.error.kind(),
                        message: rejection.error.to_string(),
                        diff: rejection.diff,
                    };
                    let verdict = verdict(case, VerdictStatus::Failed, index + 1, checked)
                        .with_failure(failure);
                    return (verdict, events);
                }
            }
        }

        events.push(
            LogEntry::new("", LogLevel::Info, "case_pass")
                .with_case(id)
                .with_outcome(Outcome::Pass)
                .with_details(json!({ "observations": checked })),
        );
        let runs = case.parameter_sets.len();
        (verdict(case, VerdictStatus::Passed, runs, checked), events)
    }
}

fn judge(
    case: &TestCase,
    set: &ParameterSet,
    index: usize,
    observations: &[Observation],
    events: &mut Vec<LogEntry>,
    checked: &mut usize,
) -> Result<(), Rejection> {
    if observations.is_empty() {
        return Err(HarnessError::InvalidCase {
            case: case.id.to_string(),
            reason: format!("operation reported no observations for {}", set.label),
        }
        .into());
    }

    for observation in observations {
        match observation {
            Observation::Value {
                expr,
                actual,
                expected,
            } => {
                let ExpectedOutcome::Value(tolerance) = case.expected else {
                    return Err(HarnessError::OutcomeMismatch {
                        case: case.id.to_string(),
                        observed: observation.kind(),
                        expected: "type",
                    }
                    .into());
                };
                if tolerance == Tolerance::Unstated
                    && (contains_float(actual) || contains_float(expected))
                {
                    events.push(
                        LogEntry::new("", LogLevel::Warn, "review_tolerance")
                            .with_case(case.id.as_str())
                            .with_parameter_set(index, set.to_string())
                            .with_expr(expr.as_str())
                            .with_details(json!({ "compared_as": "exact" })),
                    );
                }
                let context = AssertionContext::new(expr.as_str()).with_parameters(set.to_string());
                assert_values(actual, expected, tolerance, context).map_err(|failure| Rejection {
                    error: failure.into(),
                    diff: Some(diff::render_diff(&render(expected), &render(actual))),
                })?;
            }
            // Proven by the `SameAs` bound it was built under.
            Observation::Type(_) => {}
        }
        *checked += 1;
    }
    Ok(())
}

fn verdict(case: &TestCase, status: VerdictStatus, runs: usize, checked: usize) -> Verdict {
    Verdict {
        case_id: case.id.clone(),
        clause: case.clause.to_string(),
        status,
        parameter_sets_run: runs,
        observations_checked: checked,
        failure: None,
    }
}

fn failing_expr(error: &HarnessError) -> Option<&str> {
    match error {
        HarnessError::Assertion(failure) => Some(&failure.context.expr),
        _ => None,
    }
}

// Strings diff as-is, everything else as pretty JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn emit(log: &mut Option<&mut LogEmitter>, entry: LogEntry) -> Result<(), HarnessError> {
    if let Some(log) = log.as_deref_mut() {
        log.emit_entry(entry)?;
    }
    Ok(())
}
