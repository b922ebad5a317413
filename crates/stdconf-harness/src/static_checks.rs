//! Compile-time contracts.
//!
//! Every entry below expands to a `const` item: a false predicate, a type
//! mismatch or an unresolvable overload stops the build. The same table is
//! listed at run time by [`static_contracts`] so reports can show what the
//! build proved.

use serde::Serialize;
use stdconf_core::complex::{norm_f32, norm_f64, norm_i32, norm_i64, norm_u32};
use stdconf_core::iterator::{IncrementableOverload, WeaklyRegularOverload};
use stdconf_core::{Bitset, Complex, Norm, WeaklyIncrementable};

use crate::archetypes::StepCounter;

/// How a static contract is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticKind {
    /// `const` evaluation of a boolean predicate.
    ConstEval,
    /// Trait-bound type equality.
    TypeEquality,
    /// Overload resolution must select the named marker type.
    Resolution,
}

/// One compile-time contract, as listed in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticContractRecord {
    pub case: &'static str,
    pub kind: StaticKind,
    pub predicate: &'static str,
}

macro_rules! static_contract_item {
    (ConstEval($cond:expr)) => {
        $crate::static_check!($cond);
    };
    (TypeEquality($actual:ty, $expected:ty)) => {
        $crate::assert_type_eq!($actual, $expected);
    };
    (Resolution($t:ty => $marker:ty)) => {
        const _: fn() = || {
            let _: $marker = ::stdconf_core::resolve_increment_concept!($t);
        };
    };
    // `norm` of `x` equals the `Complex` norm of `(x, 0)`, once per listed `x`.
    (NormMatrix($f:ident: $t:ty => $out:ty; $($x:literal),+)) => {
        $($crate::static_check!(
            $f($x as $t) == Complex::<$out>::new($x as $out, 0 as $out).const_norm()
        );)+
    };
}

macro_rules! static_contract_records {
    ($case:literal, NormMatrix($f:ident: $t:ty => $out:ty; $($x:literal),+)) => {
        [$(StaticContractRecord {
            case: $case,
            kind: StaticKind::ConstEval,
            predicate: concat!(
                stringify!($f), "(", stringify!($x), ") == Complex::<",
                stringify!($out), ">::new(", stringify!($x), ", 0).const_norm()"
            ),
        }),+]
    };
    ($case:literal, $kind:ident($($body:tt)*)) => {
        [StaticContractRecord {
            case: $case,
            kind: StaticKind::$kind,
            predicate: stringify!($($body)*),
        }]
    };
}

macro_rules! static_contracts {
    ($($case:literal => { $($kind:ident($($body:tt)*);)* })*) => {
        $($(static_contract_item!($kind($($body)*));)*)*

        /// Every compile-time contract in this build.
        #[must_use]
        pub fn static_contracts() -> Vec<StaticContractRecord> {
            let mut records = Vec::new();
            $($(records.extend(static_contract_records!($case, $kind($($body)*)));)*)*
            records
        }
    };
}

static_contracts! {
    "bitset.storage" => {
        ConstEval(Bitset::<0>::WORDS == 0);
        ConstEval(Bitset::<1>::WORDS == 1);
        ConstEval(Bitset::<32>::WORDS == 1);
        ConstEval(Bitset::<64>::WORDS == 1);
        ConstEval(Bitset::<65>::WORDS == 2);
        ConstEval(Bitset::<1000>::WORDS == 16);
    }
    "complex.norm_overloads" => {
        TypeEquality(<f32 as Norm>::Output, f32);
        TypeEquality(<f64 as Norm>::Output, f64);
        TypeEquality(<i32 as Norm>::Output, f64);
        TypeEquality(<u32 as Norm>::Output, f64);
        TypeEquality(<i64 as Norm>::Output, f64);
        NormMatrix(norm_f32: f32 => f32; 0, 1, 10);
        NormMatrix(norm_f64: f64 => f64; 0, 1, 10);
        NormMatrix(norm_i32: i32 => f64; 0, 1, 10);
        NormMatrix(norm_u32: u32 => f64; 0, 1, 10);
        NormMatrix(norm_i64: i64 => f64; 0, 1, 10);
    }
    "iterator.incrementable_subsumption" => {
        TypeEquality(<*const i32 as WeaklyIncrementable>::PostIncrement, *const i32);
        TypeEquality(<StepCounter as WeaklyIncrementable>::PostIncrement, ());
        Resolution(*const i32 => IncrementableOverload);
        Resolution(*mut u8 => IncrementableOverload);
        Resolution(i64 => IncrementableOverload);
        Resolution(StepCounter => WeaklyRegularOverload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_lists_every_contract() {
        let contracts = static_contracts();
        assert_eq!(contracts.len(), 32);
        let resolutions = contracts
            .iter()
            .filter(|c| c.kind == StaticKind::Resolution)
            .count();
        assert_eq!(resolutions, 4);
        assert!(
            contracts
                .iter()
                .all(|c| !c.case.is_empty() && !c.predicate.is_empty())
        );
    }

    #[test]
    fn norm_values_are_proven_for_every_type_and_argument() {
        let norm_evals: Vec<_> = static_contracts()
            .into_iter()
            .filter(|c| c.case == "complex.norm_overloads" && c.kind == StaticKind::ConstEval)
            .map(|c| c.predicate)
            .collect();
        assert_eq!(norm_evals.len(), 15);
        for f in ["norm_f32", "norm_f64", "norm_i32", "norm_u32", "norm_i64"] {
            for x in ["0", "1", "10"] {
                let call = format!("{f}({x}) ==");
                assert!(
                    norm_evals.iter().any(|p| p.starts_with(&call)),
                    "missing {call}"
                );
            }
        }
        assert!(norm_evals.contains(&"norm_u32(10) == Complex::<f64>::new(10, 0).const_norm()"));
    }

    #[test]
    fn records_serialize_kind_in_snake_case() {
        let json = serde_json::to_value(&static_contracts()[0]).unwrap();
        assert_eq!(json["case"], "bitset.storage");
        assert_eq!(json["kind"], "const_eval");
    }
}
