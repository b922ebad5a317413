//! Built-in conformance cases.

pub mod bitset_ops;
pub mod complex_norm;
pub mod iter_subsumption;
pub mod pair_assign;

use crate::case::TestCase;

/// Bit counts every bitset case sweeps: empty, single bit, and both sides of
/// each storage-word boundary.
pub const BOUNDARY_SIZES: [usize; 9] = [0, 1, 31, 32, 33, 63, 64, 65, 1000];

/// Every built-in case, in definition order.
#[must_use]
pub fn catalog() -> Vec<TestCase> {
    let mut cases = Vec::new();
    cases.extend(bitset_ops::cases());
    cases.extend(pair_assign::cases());
    cases.extend(complex_norm::cases());
    cases.extend(iter_subsumption::cases());
    cases
}
