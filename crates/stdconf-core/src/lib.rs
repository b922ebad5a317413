//! # stdconf-core
//!
//! Safe Rust renditions of standard-library containers, utilities, numeric
//! types and iterator concepts. These are the constructs the `stdconf-harness`
//! conformance cases verify.
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod bitset;
pub mod complex;
pub mod iterator;
pub mod pair;

pub use bitset::{Bitset, BitsetError};
pub use complex::{Complex, Norm, norm};
pub use iterator::{IncrementConcept, Incrementable, Regular, WeaklyIncrementable};
pub use pair::{AssignFrom, Pair};
