//! Integration test: case driver run semantics
//!
//! Validates that:
//! 1. The built-in catalog passes under the default seed.
//! 2. A failing case halts the run unless keep-going is set.
//! 3. Identical seeds produce identical verdicts.
//! 4. Float comparisons without a stated tolerance are flagged for review.
//!
//! Run: cargo test -p stdconf-harness --test case_driver_test

use serde_json::{Value, json};
use stdconf_harness::case::{CaseContext, Observation};
use stdconf_harness::cases::BOUNDARY_SIZES;
use stdconf_harness::structured_log::{LogEmitter, validate_log_line};
use stdconf_harness::{
    CaseDriver, CaseRegistry, ExpectedOutcome, HarnessError, ParamValue, ParameterSet, RunConfig,
    Selection, TestCase, Tolerance,
};

fn always_wrong(_: &ParameterSet, _: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    Ok(vec![Observation::value("1 + 1", json!(3), json!(2))])
}

fn float_sum(set: &ParameterSet, _: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    let x = set.require_int("float.sum", "x")? as f64;
    Ok(vec![Observation::value(
        "x / 2 + x / 2",
        json!(x / 2.0 + x / 2.0),
        json!(x),
    )])
}

fn registry_with_failure() -> CaseRegistry {
    let mut registry = CaseRegistry::standard().unwrap();
    registry
        .register(
            TestCase::new(
                "aaa.always_wrong",
                "demo",
                always_wrong,
                ExpectedOutcome::Value(Tolerance::Exact),
            )
            .tagged(&["demo"])
            .with_parameter_set(ParameterSet::new("only").with("x", ParamValue::Int(1))),
        )
        .unwrap();
    registry
}

fn events(log: &LogEmitter) -> Vec<Value> {
    log.buffered()
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn standard_catalog_passes() {
    let registry = CaseRegistry::standard().unwrap();
    let summary = CaseDriver::default()
        .run_all(&registry, &Selection::all(), None)
        .unwrap();
    assert!(summary.all_passed(), "{:?}", summary.first_failure());
    assert_eq!(summary.total, registry.len());
    assert!(summary.not_run.is_empty());
}

#[test]
fn bitset_cases_sweep_every_boundary_size() {
    let registry = CaseRegistry::standard().unwrap();
    let selection = Selection {
        tags: vec!["bitset".into()],
        ..Selection::default()
    };
    for case in registry.select(&selection).unwrap() {
        let sizes: Vec<_> = case.parameter_sets.iter().filter_map(|s| s.size()).collect();
        assert_eq!(sizes, BOUNDARY_SIZES, "{}", case.id);
    }
}

#[test]
fn first_failing_case_stops_the_run() {
    let registry = registry_with_failure();
    let mut log = LogEmitter::to_buffer("driver-test", "ff");
    let summary = CaseDriver::default()
        .run_all(&registry, &Selection::all(), Some(&mut log))
        .unwrap();

    // Ids sort first, so the failing case runs before every catalog case.
    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.not_run.len(), registry.len() - 1);

    let failure = summary.verdicts[0].failure.as_ref().unwrap();
    assert_eq!(failure.parameter_index, 0);
    assert!(failure.message.contains("`1 + 1`"));

    let events = events(&log);
    let names: Vec<_> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(names.first(), Some(&"run_start"));
    assert_eq!(names.last(), Some(&"run_end"));
    assert!(names.contains(&"case_fail"));
    assert_eq!(
        names.iter().filter(|n| **n == "case_skip").count(),
        registry.len() - 1
    );
    let fail = events.iter().find(|e| e["event"] == "case_fail").unwrap();
    assert_eq!(fail["case_id"], "aaa.always_wrong");
    assert_eq!(fail["expr"], "1 + 1");
    assert_eq!(fail["outcome"], "fail");

    for (i, line) in log.buffered().unwrap().lines().enumerate() {
        assert!(validate_log_line(line, i + 1).is_ok(), "{line}");
    }
}

#[test]
fn keep_going_runs_every_case() {
    let registry = registry_with_failure();
    let driver = CaseDriver::new(RunConfig {
        keep_going: true,
        ..RunConfig::default()
    });
    let summary = driver.run_all(&registry, &Selection::all(), None).unwrap();
    assert_eq!(summary.total, registry.len());
    assert_eq!(summary.failed, 1);
    assert!(summary.not_run.is_empty());
}

#[test]
fn skip_tag_excludes_failing_case() {
    let registry = registry_with_failure();
    let selection = Selection {
        skip_tags: vec!["demo".into()],
        ..Selection::default()
    };
    let summary = CaseDriver::default()
        .run_all(&registry, &selection, None)
        .unwrap();
    assert!(summary.all_passed());
}

#[test]
fn identical_seeds_give_identical_verdicts() {
    let registry = CaseRegistry::standard().unwrap();
    let run = |seed| {
        let driver = CaseDriver::new(RunConfig {
            seed,
            ..RunConfig::default()
        });
        driver
            .run_all(&registry, &Selection::all(), None)
            .unwrap()
            .verdicts
    };
    assert_eq!(run(42), run(42));
    assert_eq!(run(0xDEAD_BEEF), run(0xDEAD_BEEF));
}

#[test]
fn tolerance_review_does_not_depend_on_tags() {
    let mut registry = CaseRegistry::new();
    for (id, tolerance) in [
        ("float.untagged", Tolerance::Unstated),
        ("float.exact", Tolerance::Exact),
    ] {
        registry
            .register(
                TestCase::new(id, "demo", float_sum, ExpectedOutcome::Value(tolerance))
                    .with_parameter_set(ParameterSet::new("x=3").with("x", ParamValue::Int(3))),
            )
            .unwrap();
    }
    let review = registry.tolerance_review();
    assert_eq!(review.len(), 1);
    assert_eq!(review[0].as_str(), "float.untagged");
}

#[test]
fn unstated_float_tolerance_is_flagged() {
    let mut registry = CaseRegistry::new();
    registry
        .register(
            TestCase::new(
                "float.sum",
                "demo",
                float_sum,
                ExpectedOutcome::Value(Tolerance::Unstated),
            )
            .tagged(&["floating-point"])
            .with_parameter_set(ParameterSet::new("x=3").with("x", ParamValue::Int(3))),
        )
        .unwrap();
    assert_eq!(registry.tolerance_review().len(), 1);

    let mut log = LogEmitter::to_buffer("driver-test", "tol");
    let summary = CaseDriver::default()
        .run_all(&registry, &Selection::all(), Some(&mut log))
        .unwrap();
    assert!(summary.all_passed());

    let events = events(&log);
    let review = events
        .iter()
        .find(|e| e["event"] == "review_tolerance")
        .expect("review_tolerance event");
    assert_eq!(review["level"], "warn");
    assert_eq!(review["expr"], "x / 2 + x / 2");
}

#[test]
fn unknown_case_is_an_error() {
    let registry = CaseRegistry::standard().unwrap();
    let selection = Selection {
        cases: vec!["no.such.case".into()],
        ..Selection::default()
    };
    let err = CaseDriver::default()
        .run_all(&registry, &selection, None)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown case 'no.such.case'");
}
