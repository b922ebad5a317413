//! `norm` overloads for arithmetic arguments.
//!
//! Each parameter set names an argument type `T` and a value `x`. The case
//! records the result type of `norm(x)` as a type contract and compares the
//! value with the `Complex` norm of `(x, 0)`. Both sides are computed by the
//! same squaring, so the comparison is exact.

use serde_json::json;
use stdconf_core::{Complex, Norm, norm};

use crate::case::{
    CaseContext, ExpectedOutcome, Observation, ParamValue, ParameterSet, TestCase, Tolerance,
};
use crate::error::HarnessError;
use crate::type_contract::TypeContract;

const CASE: &str = "complex.norm_overloads";

/// Argument types the case instantiates.
pub const ARGUMENT_TYPES: [&str; 5] = ["f32", "f64", "i32", "u32", "i64"];

/// Argument values, per type.
pub const ARGUMENT_VALUES: [i64; 3] = [0, 1, 10];

pub fn cases() -> Vec<TestCase> {
    let sets = ARGUMENT_TYPES.iter().flat_map(|&ty| {
        ARGUMENT_VALUES.iter().map(move |&x| {
            ParameterSet::new(format!("{ty} x={x}"))
                .with("T", ParamValue::Type(ty))
                .with("x", ParamValue::Int(x))
        })
    });
    vec![
        TestCase::new(
            CASE,
            "[cmplx.over] norm",
            norm_overloads,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("norm(x) promotes integers to f64, keeps float types, and matches Complex::norm")
        .tagged(&["complex", "numeric", "floating-point"])
        .with_parameter_sets(sets),
    ]
}

macro_rules! integral {
    ($t:ty, $set:expr, $x:expr) => {{
        let x = <$t>::try_from($x).map_err(|_| $set.unsupported(CASE, "x"))?;
        vec![
            Observation::Type(TypeContract::checked::<<$t as Norm>::Output, f64>(
                concat!("norm(x: ", stringify!($t), ")"),
            )),
            Observation::value(
                "norm(x) == Complex::<f64>::new(x as f64, 0.0).norm()",
                json!(norm(x)),
                json!(Complex::<f64>::new(x as f64, 0.0).norm()),
            ),
        ]
    }};
}

macro_rules! floating {
    ($t:ty, $x:expr) => {{
        let x = $x as $t;
        vec![
            Observation::Type(TypeContract::checked::<<$t as Norm>::Output, $t>(
                concat!("norm(x: ", stringify!($t), ")"),
            )),
            Observation::value(
                concat!(
                    "norm(x) == Complex::<",
                    stringify!($t),
                    ">::new(x, 0.0).norm()"
                ),
                json!(norm(x)),
                json!(Complex::<$t>::new(x, 0.0).norm()),
            ),
        ]
    }};
}

fn norm_overloads(
    set: &ParameterSet,
    _: &mut CaseContext,
) -> Result<Vec<Observation>, HarnessError> {
    let x = set.require_int(CASE, "x")?;
    let observations = match set.require_text(CASE, "T")? {
        "f32" => floating!(f32, x),
        "f64" => floating!(f64, x),
        "i32" => integral!(i32, set, x),
        "u32" => integral!(u32, set, x),
        "i64" => integral!(i64, set, x),
        _ => return Err(set.unsupported(CASE, "T")),
    };
    Ok(observations)
}
