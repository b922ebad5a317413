//! Case registry: explicit `CaseId -> TestCase` map built once per process.

use std::collections::BTreeMap;

use crate::case::{CaseId, TestCase, Tolerance};
use crate::cases;
use crate::error::HarnessError;

/// Which cases to run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Explicit case ids, in run order. Empty selects every case.
    pub cases: Vec<String>,
    /// Keep only cases carrying at least one of these tags.
    pub tags: Vec<String>,
    /// Drop cases carrying any of these tags.
    pub skip_tags: Vec<String>,
}

impl Selection {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    fn admits(&self, case: &TestCase) -> bool {
        let tagged = self.tags.is_empty() || self.tags.iter().any(|t| case.has_tag(t));
        let skipped = self.skip_tags.iter().any(|t| case.has_tag(t));
        tagged && !skipped
    }
}

#[derive(Debug, Default)]
pub struct CaseRegistry {
    cases: BTreeMap<CaseId, TestCase>,
}

impl CaseRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in case catalog.
    pub fn standard() -> Result<Self, HarnessError> {
        let mut registry = Self::new();
        for case in cases::catalog() {
            registry.register(case)?;
        }
        Ok(registry)
    }

    /// Add a case after validating its definition.
    pub fn register(&mut self, case: TestCase) -> Result<(), HarnessError> {
        validate(&case)?;
        if self.cases.contains_key(&case.id) {
            return Err(invalid(&case, "duplicate case id"));
        }
        self.cases.insert(case.id.clone(), case);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&TestCase, HarnessError> {
        self.cases
            .get(&CaseId::new(id))
            .ok_or_else(|| HarnessError::UnknownCase(id.to_string()))
    }

    /// Cases in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Resolve a selection. Explicit ids keep their given order; unknown ids
    /// are an error. Tag filters apply in both modes.
    pub fn select(&self, selection: &Selection) -> Result<Vec<&TestCase>, HarnessError> {
        let picked: Vec<&TestCase> = if selection.cases.is_empty() {
            self.iter().collect()
        } else {
            selection
                .cases
                .iter()
                .map(|id| self.get(id))
                .collect::<Result<_, _>>()?
        };
        Ok(picked
            .into_iter()
            .filter(|case| selection.admits(case))
            .collect())
    }

    /// Value cases without a stated tolerance, whatever their tags.
    ///
    /// Whether a case compares floats is only known once it runs, so every
    /// such case is listed here; the driver narrows it to the float
    /// comparisons it actually makes with `review_tolerance` events.
    #[must_use]
    pub fn tolerance_review(&self) -> Vec<&CaseId> {
        self.iter()
            .filter(|case| case.tolerance() == Some(Tolerance::Unstated))
            .map(|case| &case.id)
            .collect()
    }
}

fn validate(case: &TestCase) -> Result<(), HarnessError> {
    if case.id.as_str().trim().is_empty() {
        return Err(invalid(case, "empty case id"));
    }
    if case.parameter_sets.is_empty() {
        return Err(invalid(case, "no parameter sets"));
    }
    if case.sweeps_size() {
        for required in [0, 1] {
            if !case.parameter_sets.iter().any(|s| s.size() == Some(required)) {
                return Err(invalid(
                    case,
                    &format!("size sweep must include N={required}"),
                ));
            }
        }
    }
    if let Some(Tolerance::Absolute(eps)) = case.tolerance()
        && !(eps.is_finite() && eps >= 0.0)
    {
        return Err(invalid(case, "tolerance must be finite and non-negative"));
    }
    Ok(())
}

fn invalid(case: &TestCase, reason: &str) -> HarnessError {
    HarnessError::InvalidCase {
        case: case.id.to_string(),
        reason: reason.to_string(),
    }
}
