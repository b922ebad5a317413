//! Conformance testing harness for stdconf-core.
//!
//! This crate provides:
//! - Assertion engine: runtime checks that propagate failures, static checks
//!   that fail the build
//! - Case driver: parameter sweeps over explicit boundary sizes, fail-fast
//! - Type-contract checker: result-type equality without evaluating values
//! - Structured JSONL logs and markdown/JSON conformance reports

#![forbid(unsafe_code)]

pub mod archetypes;
pub mod assertion;
pub mod case;
pub mod cases;
pub mod diff;
pub mod driver;
pub mod error;
pub mod registry;
pub mod report;
pub mod rng;
pub mod static_checks;
pub mod structured_log;
pub mod type_contract;
pub mod verify;

pub use case::{CaseId, ExpectedOutcome, Observation, ParamValue, ParameterSet, TestCase, Tolerance};
pub use driver::{CaseDriver, RunConfig};
pub use error::{AssertionFailure, HarnessError};
pub use registry::{CaseRegistry, Selection};
pub use report::ConformanceReport;
pub use type_contract::{TypeContract, TypeTag, check_type};
pub use verify::{Verdict, VerdictStatus, VerdictSummary};
