//! Test-case data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HarnessError;
use crate::rng::SplitMix64;
use crate::type_contract::TypeContract;

/// Stable case identifier, e.g. `bitset.xor_assign`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One concrete input value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    /// Size of a structural type (bit count, element count).
    Size(usize),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Name of a type the operation is instantiated with.
    Type(&'static str),
    Text(&'static str),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Type(v) | Self::Text(v) => f.write_str(v),
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Param {
    pub name: &'static str,
    pub value: ParamValue,
}

/// Ordered, named inputs for one invocation of a case's operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub label: String,
    pub params: Vec<Param>,
}

impl ParameterSet {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            params: Vec::new(),
        }
    }

    /// Parameter set with only a size dimension `N`.
    #[must_use]
    pub fn sized(size: usize) -> Self {
        Self::new(format!("N={size}")).with("N", ParamValue::Size(size))
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: ParamValue) -> Self {
        self.params.push(Param { name, value });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    /// The size dimension, if this set has one.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        self.params.iter().find_map(|p| match p.value {
            ParamValue::Size(n) => Some(n),
            _ => None,
        })
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ParamValue::Int(v) => Some(v),
            ParamValue::UInt(v) => i64::try_from(v).ok(),
            ParamValue::Size(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&'static str> {
        match self.get(name)? {
            ParamValue::Type(v) | ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Integer parameter, or `UnsupportedParameter` naming it.
    pub fn require_int(&self, case: &str, name: &str) -> Result<i64, HarnessError> {
        self.int(name).ok_or_else(|| self.unsupported(case, name))
    }

    /// Type/text parameter, or `UnsupportedParameter` naming it.
    pub fn require_text(&self, case: &str, name: &str) -> Result<&'static str, HarnessError> {
        self.text(name).ok_or_else(|| self.unsupported(case, name))
    }

    /// Error for a parameter this set cannot provide or the operation cannot
    /// instantiate.
    #[must_use]
    pub fn unsupported(&self, case: &str, name: &str) -> HarnessError {
        let parameter = match self.get(name) {
            Some(value) => format!("{name}={value}"),
            None => format!("{name} (missing)"),
        };
        HarnessError::UnsupportedParameter {
            case: case.to_string(),
            parameter,
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.label)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", p.name, p.value)?;
        }
        f.write_str("}")
    }
}

/// Numeric comparison policy for value observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "policy", content = "epsilon", rename_all = "snake_case")]
pub enum Tolerance {
    /// Bit-exact equality, stated by the case.
    Exact,
    /// `|actual - expected| <= epsilon`.
    Absolute(f64),
    /// No tolerance stated. Compared exactly; float comparisons under this
    /// policy are flagged for review.
    Unstated,
}

impl Tolerance {
    #[must_use]
    pub fn accepts(self, actual: f64, expected: f64) -> bool {
        match self {
            Self::Exact | Self::Unstated => actual == expected,
            Self::Absolute(eps) => (actual - expected).abs() <= eps,
        }
    }
}

/// How a case's observations are judged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "tolerance", rename_all = "snake_case")]
pub enum ExpectedOutcome {
    /// Every value observation's actual matches its expected value. Type
    /// observations reported alongside are verified too.
    Value(Tolerance),
    /// Every observation is a type contract that must hold.
    Type,
}

/// What an operation reports for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    Value {
        expr: String,
        actual: Value,
        expected: Value,
    },
    Type(TypeContract),
}

impl Observation {
    #[must_use]
    pub fn value(expr: impl Into<String>, actual: Value, expected: Value) -> Self {
        Self::Value {
            expr: expr.into(),
            actual,
            expected,
        }
    }

    #[must_use]
    pub fn expr(&self) -> &str {
        match self {
            Self::Value { expr, .. } => expr,
            Self::Type(contract) => contract.expr(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Value { .. } => "value",
            Self::Type(_) => "type",
        }
    }
}

impl From<TypeContract> for Observation {
    fn from(contract: TypeContract) -> Self {
        Self::Type(contract)
    }
}

/// Per-invocation state handed to an operation.
#[derive(Debug)]
pub struct CaseContext {
    rng: SplitMix64,
}

impl CaseContext {
    /// Context whose random stream starts from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix64::new(seed),
        }
    }

    pub fn rng(&mut self) -> &mut SplitMix64 {
        &mut self.rng
    }
}

/// Invokes the construct under test for one parameter set.
pub type Operation =
    fn(&ParameterSet, &mut CaseContext) -> Result<Vec<Observation>, HarnessError>;

/// A named unit of verification.
#[derive(Clone)]
pub struct TestCase {
    pub id: CaseId,
    pub description: &'static str,
    /// Library clause the case verifies, e.g. `[template.bitset] operator^`.
    pub clause: &'static str,
    /// Applicability metadata used for selection.
    pub tags: Vec<&'static str>,
    pub parameter_sets: Vec<ParameterSet>,
    pub operation: Operation,
    pub expected: ExpectedOutcome,
}

impl TestCase {
    #[must_use]
    pub fn new(
        id: impl Into<CaseId>,
        clause: &'static str,
        operation: Operation,
        expected: ExpectedOutcome,
    ) -> Self {
        Self {
            id: id.into(),
            description: "",
            clause,
            tags: Vec::new(),
            parameter_sets: Vec::new(),
            operation,
            expected,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn tagged(mut self, tags: &[&'static str]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    #[must_use]
    pub fn with_parameter_set(mut self, set: ParameterSet) -> Self {
        self.parameter_sets.push(set);
        self
    }

    #[must_use]
    pub fn with_parameter_sets(mut self, sets: impl IntoIterator<Item = ParameterSet>) -> Self {
        self.parameter_sets.extend(sets);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }

    /// True if any parameter set carries a size dimension.
    #[must_use]
    pub fn sweeps_size(&self) -> bool {
        self.parameter_sets.iter().any(|s| s.size().is_some())
    }

    #[must_use]
    pub fn tolerance(&self) -> Option<Tolerance> {
        match self.expected {
            ExpectedOutcome::Value(tolerance) => Some(tolerance),
            ExpectedOutcome::Type => None,
        }
    }
}

impl From<String> for CaseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("clause", &self.clause)
            .field("tags", &self.tags)
            .field("parameter_sets", &self.parameter_sets.len())
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}
