//! `Bitset` operator cases swept over [`BOUNDARY_SIZES`].

use serde_json::json;
use stdconf_core::Bitset;

use super::BOUNDARY_SIZES;
use crate::case::{CaseContext, ExpectedOutcome, Observation, ParameterSet, TestCase, Tolerance};
use crate::error::HarnessError;

const XOR_ASSIGN: &str = "bitset.xor_assign";
const NOT: &str = "bitset.not";
const AND_OR_ASSIGN: &str = "bitset.and_or_assign";

pub fn cases() -> Vec<TestCase> {
    let sweep = || BOUNDARY_SIZES.iter().map(|&n| ParameterSet::sized(n));
    vec![
        TestCase::new(
            XOR_ASSIGN,
            "[template.bitset] operator^",
            xor_assign,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("v1 ^ v2 equals v3 ^= v2 where v3 is a copy of v1")
        .tagged(&["bitset", "size-sweep"])
        .with_parameter_sets(sweep()),
        TestCase::new(
            NOT,
            "[template.bitset] operator~",
            not,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("!v flips exactly the N in-range bits")
        .tagged(&["bitset", "size-sweep"])
        .with_parameter_sets(sweep()),
        TestCase::new(
            AND_OR_ASSIGN,
            "[template.bitset] operator&, operator|",
            and_or_assign,
            ExpectedOutcome::Value(Tolerance::Exact),
        )
        .describe("& and | agree with &= and |=")
        .tagged(&["bitset", "size-sweep"])
        .with_parameter_sets(sweep()),
    ]
}

// Instantiates `$f::<N>` for the swept sizes; any other size is unsupported.
macro_rules! dispatch_size {
    ($case:expr, $set:expr, $ctx:expr, $f:ident) => {
        match $set.size() {
            Some(0) => $f::<0>($ctx),
            Some(1) => $f::<1>($ctx),
            Some(31) => $f::<31>($ctx),
            Some(32) => $f::<32>($ctx),
            Some(33) => $f::<33>($ctx),
            Some(63) => $f::<63>($ctx),
            Some(64) => $f::<64>($ctx),
            Some(65) => $f::<65>($ctx),
            Some(1000) => $f::<1000>($ctx),
            _ => Err($set.unsupported($case, "N")),
        }
    };
}

fn xor_assign(set: &ParameterSet, ctx: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    dispatch_size!(XOR_ASSIGN, set, ctx, xor_assign_n)
}

fn not(set: &ParameterSet, ctx: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    dispatch_size!(NOT, set, ctx, not_n)
}

fn and_or_assign(
    set: &ParameterSet,
    ctx: &mut CaseContext,
) -> Result<Vec<Observation>, HarnessError> {
    dispatch_size!(AND_OR_ASSIGN, set, ctx, and_or_assign_n)
}

/// A bitset with each bit drawn independently from the case stream.
pub fn random_bitset<const N: usize>(ctx: &mut CaseContext) -> Result<Bitset<N>, HarnessError> {
    let mut v = Bitset::<N>::new();
    for pos in 0..N {
        let bit = ctx.rng().next_bool();
        v.set(pos, bit)?;
    }
    Ok(v)
}

fn xor_assign_n<const N: usize>(ctx: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    let v1 = random_bitset::<N>(ctx)?;
    let v2 = random_bitset::<N>(ctx)?;
    let mut v3 = v1.clone();
    v3 ^= &v2;
    Ok(vec![Observation::value(
        "(v1 ^ v2) == (v3 ^= v2)",
        json!(v3.to_string()),
        json!((&v1 ^ &v2).to_string()),
    )])
}

fn not_n<const N: usize>(ctx: &mut CaseContext) -> Result<Vec<Observation>, HarnessError> {
    let v = random_bitset::<N>(ctx)?;
    let flipped = !&v;
    Ok(vec![
        Observation::value(
            "!v == v ^ all()",
            json!(flipped.to_string()),
            json!((&v ^ &Bitset::<N>::all()).to_string()),
        ),
        Observation::value(
            "!!v == v",
            json!((!&flipped).to_string()),
            json!(v.to_string()),
        ),
        Observation::value(
            "(!v).count() == N - v.count()",
            json!(flipped.count()),
            json!(N - v.count()),
        ),
        Observation::value("all().count() == N", json!(Bitset::<N>::all().count()), json!(N)),
    ])
}

fn and_or_assign_n<const N: usize>(
    ctx: &mut CaseContext,
) -> Result<Vec<Observation>, HarnessError> {
    let v1 = random_bitset::<N>(ctx)?;
    let v2 = random_bitset::<N>(ctx)?;
    let mut anded = v1.clone();
    anded &= &v2;
    let mut ored = v1.clone();
    ored |= &v2;
    Ok(vec![
        Observation::value(
            "(v1 & v2) == (v3 &= v2)",
            json!(anded.to_string()),
            json!((&v1 & &v2).to_string()),
        ),
        Observation::value(
            "(v1 | v2) == (v3 |= v2)",
            json!(ored.to_string()),
            json!((&v1 | &v2).to_string()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::CaseDriver;

    #[test]
    fn every_bitset_case_passes() {
        let driver = CaseDriver::default();
        for case in cases() {
            let verdict = driver.run_case(&case);
            assert!(verdict.passed(), "{}: {:?}", case.id, verdict.failure);
            assert_eq!(verdict.parameter_sets_run, BOUNDARY_SIZES.len());
        }
    }

    #[test]
    fn random_bitsets_follow_the_seed() {
        let a = random_bitset::<65>(&mut CaseContext::new(7)).unwrap();
        let b = random_bitset::<65>(&mut CaseContext::new(7)).unwrap();
        let c = random_bitset::<65>(&mut CaseContext::new(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unlisted_size_is_unsupported() {
        let err = xor_assign(&ParameterSet::sized(2), &mut CaseContext::new(0)).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedParameter");
        assert!(err.to_string().contains("N=2"));
    }

    #[test]
    fn xor_observation_compares_rendered_bits() {
        let observations = xor_assign_n::<33>(&mut CaseContext::new(1)).unwrap();
        let Observation::Value { actual, expected, .. } = &observations[0] else {
            panic!("expected a value observation");
        };
        assert_eq!(actual, expected);
        assert_eq!(actual.as_str().map(str::len), Some(33));
    }
}
