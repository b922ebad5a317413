//! Concept subsumption between `Incrementable` and
//! `WeaklyIncrementable + Regular`.
//!
//! Every row names a type and the overload marker that resolution must pick.
//! The row expands to a `TypeContract::checked_val`, so a row whose marker is
//! wrong does not compile.

use stdconf_core::iterator::{IncrementableOverload, WeaklyRegularOverload};

use crate::archetypes::StepCounter;
use crate::case::{CaseContext, ExpectedOutcome, Observation, ParamValue, ParameterSet, TestCase};
use crate::error::HarnessError;
use crate::type_contract::TypeContract;

const CASE: &str = "iterator.incrementable_subsumption";

macro_rules! subsumption_rows {
    ($($t:ty => $marker:ident),* $(,)?) => {
        fn rows() -> Vec<ParameterSet> {
            vec![$(
                ParameterSet::new(stringify!($t))
                    .with("T", ParamValue::Type(stringify!($t)))
                    .with("expected", ParamValue::Type(stringify!($marker))),
            )*]
        }

        fn resolve(
            set: &ParameterSet,
            _: &mut CaseContext,
        ) -> Result<Vec<Observation>, HarnessError> {
            let ty = set.require_text(CASE, "T")?;
            $(
                if ty == stringify!($t) {
                    return Ok(vec![Observation::Type(TypeContract::checked_val::<$marker, _>(
                        concat!("resolve_increment_concept!(", stringify!($t), ")"),
                        &::stdconf_core::resolve_increment_concept!($t),
                    ))]);
                }
            )*
            Err(set.unsupported(CASE, "T"))
        }
    };
}

subsumption_rows! {
    *const i32 => IncrementableOverload,
    *mut u8 => IncrementableOverload,
    i64 => IncrementableOverload,
    StepCounter => WeaklyRegularOverload,
}

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            CASE,
            "[iterator.concept.inc] incrementable",
            resolve,
            ExpectedOutcome::Type,
        )
        .describe("the incrementable overload is preferred whenever it applies")
        .tagged(&["iterator", "concepts", "compile-only"])
        .with_parameter_sets(rows()),
    ]
}
