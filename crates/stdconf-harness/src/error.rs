//! Harness error taxonomy.

use thiserror::Error;

use crate::assertion::AssertionContext;

/// A runtime predicate evaluated false.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("assertion failed: {context}{}", render_detail(.detail.as_deref()))]
pub struct AssertionFailure {
    pub context: AssertionContext,
    pub detail: Option<String>,
}

/// Failures a run can report. Static contracts have no variant here: a false
/// one fails the build.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    #[error("unknown case '{0}'")]
    UnknownCase(String),
    #[error("invalid case '{case}': {reason}")]
    InvalidCase { case: String, reason: String },
    #[error("case '{case}' cannot instantiate parameter {parameter}")]
    UnsupportedParameter { case: String, parameter: String },
    #[error("case '{case}' reported {observed} but expects {expected}")]
    OutcomeMismatch {
        case: String,
        observed: &'static str,
        expected: &'static str,
    },
    #[error("invalid seed '{raw}': {reason}")]
    InvalidSeed { raw: String, reason: String },
    #[error(transparent)]
    Bitset(#[from] stdconf_core::BitsetError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Stable short label for logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Assertion(_) => "AssertionFailure",
            Self::UnknownCase(_) => "UnknownCase",
            Self::InvalidCase { .. } => "InvalidCase",
            Self::UnsupportedParameter { .. } => "UnsupportedParameter",
            Self::OutcomeMismatch { .. } => "OutcomeMismatch",
            Self::InvalidSeed { .. } => "InvalidSeed",
            Self::Bitset(_) => "BitsetError",
            Self::Io(_) => "Io",
        }
    }
}

fn render_detail(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}
