//! Incrementability concepts and constraint resolution between them.
//!
//! [`Incrementable`] refines [`WeaklyIncrementable`] + [`Regular`] by
//! requiring post-increment to yield the prior value as `Self`. When both
//! apply, [`resolve_increment_concept!`](crate::resolve_increment_concept)
//! selects the `Incrementable` overload, mirroring subsumption-based
//! overload ordering. Selection happens during type checking.

use core::marker::PhantomData;

/// A type that can be advanced in place.
pub trait WeaklyIncrementable: Sized {
    /// Signed distance type between two values.
    type Difference;
    /// Result of post-increment.
    type PostIncrement;

    /// Advance and return the advanced value.
    fn pre_increment(&mut self) -> &mut Self;

    /// Advance, returning whatever the type's post-increment yields.
    fn post_increment(&mut self) -> Self::PostIncrement;
}

/// Copyable and equality comparable.
pub trait Regular: Clone + Eq {}

impl<T: Clone + Eq> Regular for T {}

/// Weakly incrementable, regular, and post-increment yields the prior value.
pub trait Incrementable: WeaklyIncrementable<PostIncrement = Self> + Regular {}

impl<T> Incrementable for T where T: WeaklyIncrementable<PostIncrement = T> + Regular {}

impl<T> WeaklyIncrementable for *const T {
    type Difference = isize;
    type PostIncrement = Self;

    fn pre_increment(&mut self) -> &mut Self {
        *self = self.wrapping_add(1);
        self
    }

    fn post_increment(&mut self) -> Self {
        let prev = *self;
        *self = self.wrapping_add(1);
        prev
    }
}

impl<T> WeaklyIncrementable for *mut T {
    type Difference = isize;
    type PostIncrement = Self;

    fn pre_increment(&mut self) -> &mut Self {
        *self = self.wrapping_add(1);
        self
    }

    fn post_increment(&mut self) -> Self {
        let prev = *self;
        *self = self.wrapping_add(1);
        prev
    }
}

macro_rules! integer_incrementable {
    ($($t:ty => $diff:ty),+ $(,)?) => {
        $(
            impl WeaklyIncrementable for $t {
                type Difference = $diff;
                type PostIncrement = Self;

                fn pre_increment(&mut self) -> &mut Self {
                    *self = self.wrapping_add(1);
                    self
                }

                fn post_increment(&mut self) -> Self {
                    let prev = *self;
                    *self = self.wrapping_add(1);
                    prev
                }
            }
        )+
    };
}

integer_incrementable! {
    i8 => i8,
    i16 => i16,
    i32 => i32,
    i64 => i64,
    isize => isize,
    usize => isize,
}

/// Which constrained overload was selected for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementConcept {
    Incrementable,
    WeaklyIncrementableRegular,
}

impl IncrementConcept {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incrementable => "incrementable",
            Self::WeaklyIncrementableRegular => "weakly_incrementable+regular",
        }
    }
}

/// Marker returned when the `Incrementable` overload is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementableOverload;

/// Marker returned when the `WeaklyIncrementable + Regular` overload is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaklyRegularOverload;

/// Implemented by the overload markers.
pub trait SelectedOverload {
    const CONCEPT: IncrementConcept;

    fn concept(&self) -> IncrementConcept {
        Self::CONCEPT
    }
}

impl SelectedOverload for IncrementableOverload {
    const CONCEPT: IncrementConcept = IncrementConcept::Incrementable;
}

impl SelectedOverload for WeaklyRegularOverload {
    const CONCEPT: IncrementConcept = IncrementConcept::WeaklyIncrementableRegular;
}

#[doc(hidden)]
pub struct ConceptProbe<T>(PhantomData<T>);

impl<T> ConceptProbe<T> {
    #[doc(hidden)]
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ConceptProbe<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Method lookup tries `&&&ConceptProbe<T>` before auto-deref to
// `&&ConceptProbe<T>`, so the stronger impl is found first when it applies.
#[doc(hidden)]
pub trait ViaIncrementable {
    fn resolve_increment_concept(&self) -> IncrementableOverload {
        IncrementableOverload
    }
}

impl<T: Incrementable> ViaIncrementable for &&ConceptProbe<T> {}

#[doc(hidden)]
pub trait ViaWeaklyIncrementableRegular {
    fn resolve_increment_concept(&self) -> WeaklyRegularOverload {
        WeaklyRegularOverload
    }
}

impl<T: WeaklyIncrementable + Regular> ViaWeaklyIncrementableRegular for &ConceptProbe<T> {}

/// Select the most refined increment concept satisfied by a concrete type.
///
/// Evaluates to [`IncrementableOverload`] or [`WeaklyRegularOverload`]. Types
/// satisfying neither fail to compile.
#[macro_export]
macro_rules! resolve_increment_concept {
    ($t:ty) => {{
        #[allow(unused_imports)]
        use $crate::iterator::{
            ViaIncrementable as _, ViaWeaklyIncrementableRegular as _,
        };
        (&&&$crate::iterator::ConceptProbe::<$t>::new()).resolve_increment_concept()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ticker(u32);

    impl WeaklyIncrementable for Ticker {
        type Difference = i32;
        type PostIncrement = ();

        fn pre_increment(&mut self) -> &mut Self {
            self.0 += 1;
            self
        }

        fn post_increment(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn raw_pointer_prefers_incrementable() {
        let selected = resolve_increment_concept!(*const i32);
        assert_eq!(selected, IncrementableOverload);
        assert_eq!(selected.concept(), IncrementConcept::Incrementable);
        assert_eq!(
            resolve_increment_concept!(*mut u8).concept(),
            IncrementConcept::Incrementable
        );
    }

    #[test]
    fn weak_post_increment_falls_back() {
        let selected = resolve_increment_concept!(Ticker);
        assert_eq!(selected, WeaklyRegularOverload);
        assert_eq!(
            selected.concept().as_str(),
            "weakly_incrementable+regular"
        );

        let mut t = Ticker(0);
        t.post_increment();
        t.pre_increment();
        assert_eq!(t, Ticker(2));
    }

    #[test]
    fn pointer_increment_steps_by_element() {
        let data = [10_u16, 20, 30];
        let mut p = data.as_ptr();
        let before = p.post_increment();
        assert_eq!(before, data.as_ptr());
        p.pre_increment();
        assert_eq!(p, data.as_ptr().wrapping_add(2));
    }

    #[test]
    fn integer_post_increment_returns_prior_value() {
        let mut n = i32::MAX;
        assert_eq!(n.post_increment(), i32::MAX);
        assert_eq!(n, i32::MIN);
        let mut u = 0_usize;
        assert_eq!(*u.pre_increment(), 1);
    }
}
