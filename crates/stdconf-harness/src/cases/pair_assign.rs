//! `Pair` converting assignment cases.

use serde_json::json;
use stdconf_core::Pair;

use crate::archetypes::{AssignTracker, TrackedValue};
use crate::case::{
    CaseContext, ExpectedOutcome, Observation, ParamValue, ParameterSet, TestCase, Tolerance,
};
use crate::error::HarnessError;

const SCALAR: &str = "pair.assign_convertible";
const TRACKED: &str = "pair.assign_tracked";

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            SCALAR,
            "[pairs.pair] operator=(const pair<U, V>&)",
            assign_scalar,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("Pair<f64, i64> assigned from Pair<i32, i16> converts each element")
        .tagged(&["pair", "floating-point"])
        .with_parameter_set(
            ParameterSet::new("(3, 4)")
                .with("first", ParamValue::Int(3))
                .with("second", ParamValue::Int(4)),
        )
        .with_parameter_set(
            ParameterSet::new("extremes")
                .with("first", ParamValue::Int(i64::from(i32::MIN)))
                .with("second", ParamValue::Int(i64::from(i16::MAX))),
        ),
        TestCase::new(
            TRACKED,
            "[pairs.pair] operator=(const pair<U, V>&)",
            assign_tracked,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("element-wise assignment copies from lvalues and moves from rvalues")
        .tagged(&["pair", "special-members"])
        .with_parameter_set(
            ParameterSet::new("lvalue source")
                .with("source", ParamValue::Text("lvalue"))
                .with("first", ParamValue::Int(42))
                .with("second", ParamValue::Int(-42)),
        )
        .with_parameter_set(
            ParameterSet::new("rvalue source")
                .with("source", ParamValue::Text("rvalue"))
                .with("first", ParamValue::Int(7))
                .with("second", ParamValue::Int(-7)),
        ),
    ]
}

fn assign_scalar(set: &ParameterSet, _: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    let first = i32::try_from(set.require_int(SCALAR, "first")?)
        .map_err(|_| set.unsupported(SCALAR, "first"))?;
    let second = i16::try_from(set.require_int(SCALAR, "second")?)
        .map_err(|_| set.unsupported(SCALAR, "second"))?;

    let source: Pair<i32, i16> = Pair::new(first, second);
    let mut target: Pair<f64, i64> = Pair::default();
    target.assign_from(&source);

    Ok(vec![
        Observation::value("p2.first", json!(target.first), json!(f64::from(first))),
        Observation::value("p2.second", json!(target.second), json!(i64::from(second))),
        Observation::value(
            "p1 unchanged",
            json!([source.first, source.second]),
            json!([first, second]),
        ),
    ])
}

fn assign_tracked(
    set: &ParameterSet,
    _: &mut CaseContext,
) -> Result<Vec<Observation>, HarnessError> {
    let first = i32::try_from(set.require_int(TRACKED, "first")?)
        .map_err(|_| set.unsupported(TRACKED, "first"))?;
    let second = i32::try_from(set.require_int(TRACKED, "second")?)
        .map_err(|_| set.unsupported(TRACKED, "second"))?;

    let tracker = AssignTracker::new();
    let source: Pair<i32, TrackedValue> = Pair::new(first, TrackedValue::new(second, &tracker));
    let mut target: Pair<i64, TrackedValue> = Pair::new(101, TrackedValue::new(101, &tracker));
    tracker.reset();

    let (copies, moves) = match set.require_text(TRACKED, "source")? {
        "lvalue" => {
            target.assign_from(&source);
            (1, 0)
        }
        "rvalue" => {
            target.assign_from_owned(source);
            (0, 1)
        }
        _ => return Err(set.unsupported(TRACKED, "source")),
    };

    Ok(vec![
        Observation::value(
            "special member counts",
            json!({
                "constructed": tracker.constructed(),
                "assigned": tracker.assigned(),
                "copy_assigned": tracker.copy_assigned(),
                "move_assigned": tracker.move_assigned(),
            }),
            json!({
                "constructed": 0,
                "assigned": 1,
                "copy_assigned": copies,
                "move_assigned": moves,
            }),
        ),
        Observation::value("p.first", json!(target.first), json!(i64::from(first))),
        Observation::value("p.second.value", json!(target.second.value), json!(second)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::CaseDriver;

    #[test]
    fn pair_cases_pass() {
        let driver = CaseDriver::default();
        for case in cases() {
            let verdict = driver.run_case(&case);
            assert!(verdict.passed(), "{}: {:?}", case.id, verdict.failure);
        }
    }

    #[test]
    fn scalar_assignment_converts_three_four() {
        let set = ParameterSet::new("(3, 4)")
            .with("first", ParamValue::Int(3))
            .with("second", ParamValue::Int(4));
        let observations = assign_scalar(&set, &mut CaseContext::new(0)).unwrap();
        assert_eq!(
            observations[0],
            Observation::value("p2.first", json!(3.0), json!(3.0))
        );
        assert_eq!(
            observations[1],
            Observation::value("p2.second", json!(4), json!(4))
        );
    }

    #[test]
    fn out_of_range_first_is_unsupported() {
        let set = ParameterSet::new("wide")
            .with("first", ParamValue::Int(i64::MAX))
            .with("second", ParamValue::Int(0));
        let err = assign_scalar(&set, &mut CaseContext::new(0)).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedParameter");
    }

    #[test]
    fn unknown_source_kind_is_unsupported() {
        let set = ParameterSet::new("xvalue")
            .with("source", ParamValue::Text("xvalue"))
            .with("first", ParamValue::Int(1))
            .with("second", ParamValue::Int(1));
        let err = assign_tracked(&set, &mut CaseContext::new(0)).unwrap_err();
        assert!(err.to_string().contains("source=xvalue"));
    }
}
