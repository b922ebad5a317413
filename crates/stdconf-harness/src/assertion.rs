//! Assertion engine.
//!
//! Runtime mode: [`assert_true`] and [`assert_values`] return an
//! [`AssertionFailure`] that callers propagate with `?`; the [`check!`]
//! macro captures source location and expression text.
//!
//! Static mode: [`static_check!`] and [`assert_type_eq!`] expand to `const`
//! items evaluated by the compiler. A false predicate is a build error.
//!
//! [`check!`]: crate::check
//! [`static_check!`]: crate::static_check
//! [`assert_type_eq!`]: crate::assert_type_eq

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::case::Tolerance;
use crate::error::AssertionFailure;

/// Source position of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

/// What was asserted, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionContext {
    pub expr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

impl AssertionContext {
    #[must_use]
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            location: None,
            parameters: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: &'static str, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation { file, line, column });
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }
}

impl fmt::Display for AssertionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.expr)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}:{}:{}", loc.file, loc.line, loc.column)?;
        }
        if let Some(params) = &self.parameters {
            write!(f, " with {params}")?;
        }
        Ok(())
    }
}

/// Fail with `context` unless `condition` holds.
pub fn assert_true(condition: bool, context: AssertionContext) -> Result<(), AssertionFailure> {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure {
            context,
            detail: None,
        })
    }
}

/// Fail with `context` unless `actual` matches `expected` under `tolerance`.
pub fn assert_values(
    actual: &Value,
    expected: &Value,
    tolerance: Tolerance,
    context: AssertionContext,
) -> Result<(), AssertionFailure> {
    if values_match(actual, expected, tolerance) {
        Ok(())
    } else {
        Err(AssertionFailure {
            context,
            detail: Some(format!("expected {expected}, got {actual}")),
        })
    }
}

/// Structural comparison with numeric tolerance applied at the leaves.
///
/// Integers compare exactly. Any comparison involving a float uses the
/// tolerance; `Exact` and `Unstated` both require `==`.
#[must_use]
pub fn values_match(actual: &Value, expected: &Value, tolerance: Tolerance) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if a.is_f64() || b.is_f64() {
                match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => tolerance.accepts(x, y),
                    _ => false,
                }
            } else {
                a == b
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| values_match(x, y, tolerance))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| {
                    b.get(key)
                        .is_some_and(|y| values_match(x, y, tolerance))
                })
        }
        _ => actual == expected,
    }
}

/// True if the value contains a floating-point number anywhere.
#[must_use]
pub fn contains_float(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_f64(),
        Value::Array(items) => items.iter().any(contains_float),
        Value::Object(map) => map.values().any(contains_float),
        _ => false,
    }
}

/// Build an [`AssertionContext`] for an expression at the call site.
#[macro_export]
macro_rules! context {
    ($expr:expr) => {
        $crate::assertion::AssertionContext::new($expr).at(file!(), line!(), column!())
    };
}

/// Runtime assertion. Returns early with the failure converted by `?`.
///
/// The optional second argument is a parameter set rendered into the
/// diagnostic.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        $crate::assertion::assert_true($cond, $crate::context!(stringify!($cond)))?
    };
    ($cond:expr, $params:expr $(,)?) => {
        $crate::assertion::assert_true(
            $cond,
            $crate::context!(stringify!($cond)).with_parameters($params.to_string()),
        )?
    };
}

/// Compile-time assertion. A false condition fails the build.
#[macro_export]
macro_rules! static_check {
    ($cond:expr $(,)?) => {
        const _: () = ::core::assert!($cond);
    };
    ($cond:expr, $msg:literal $(,)?) => {
        const _: () = ::core::assert!($cond, $msg);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use serde_json::json;

    fn guarded(flag: bool) -> Result<u32, HarnessError> {
        check!(flag);
        Ok(7)
    }

    #[test]
    fn check_passes_through_on_true() {
        assert_eq!(guarded(true).unwrap(), 7);
    }

    #[test]
    fn check_reports_expression_and_location() {
        let failure = match guarded(false).unwrap_err() {
            HarnessError::Assertion(failure) => failure,
            other => panic!("expected assertion failure, got {other:?}"),
        };
        assert_eq!(failure.context.expr, "flag");
        let loc = failure.context.location.expect("location captured");
        assert!(loc.file.ends_with("assertion.rs"));
        assert!(failure.to_string().starts_with("assertion failed: `flag` at "));
    }

    #[test]
    fn context_renders_parameters() {
        let ctx = AssertionContext::new("a == b").with_parameters("N=31");
        assert_eq!(ctx.to_string(), "`a == b` with N=31");
    }

    #[test]
    fn exact_tolerance_rejects_tiny_float_differences() {
        let a = json!(0.1_f64 + 0.2);
        let b = json!(0.3_f64);
        assert!(!values_match(&a, &b, Tolerance::Exact));
        assert!(!values_match(&a, &b, Tolerance::Unstated));
        assert!(values_match(&a, &b, Tolerance::Absolute(1e-12)));
    }

    #[test]
    fn integers_and_floats_compare_numerically() {
        assert!(values_match(&json!(3), &json!(3.0), Tolerance::Exact));
        assert!(values_match(&json!([3.0, 4]), &json!([3, 4]), Tolerance::Exact));
        assert!(!values_match(&json!([3.0]), &json!([3.0, 4]), Tolerance::Exact));
    }

    #[test]
    fn assert_values_detail_names_both_sides() {
        let err = assert_values(
            &json!("0110"),
            &json!("0111"),
            Tolerance::Exact,
            AssertionContext::new("v1 ^ v2"),
        )
        .unwrap_err();
        assert_eq!(
            err.detail.as_deref(),
            Some("expected \"0111\", got \"0110\"")
        );
    }

    #[test]
    fn float_detection_walks_nested_values() {
        assert!(contains_float(&json!({"pair": [1, 2.5]})));
        assert!(!contains_float(&json!({"pair": [1, 2]})));
    }

    static_check!(1 + 1 == 2);
    static_check!(u64::BITS == 64, "64-bit storage words");
}
