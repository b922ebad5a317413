//! Type-contract checker.
//!
//! Compares the type an expression produces against a declared type without
//! evaluating the expression. A [`TypeContract`] can only be built through a
//! `SameAs` bound, so a mismatch never reaches run time: the crate does not
//! compile. [`check_type`] answers the same question as a plain predicate.

use std::any::{TypeId, type_name};

use serde::Serialize;

/// Implemented exactly when `Self` and `T` are the same type.
pub trait SameAs<T: ?Sized> {}

impl<T: ?Sized> SameAs<T> for T {}

/// Identity of a type, with its name for diagnostics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeTag {
    pub name: &'static str,
    #[serde(skip)]
    id: TypeId,
}

impl TypeTag {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Tag of the static type of `value`. `value` is only borrowed.
    #[must_use]
    pub fn of_val<T: ?Sized + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

/// `true` iff `A` and `B` are the same type.
#[must_use]
pub fn check_type<A: ?Sized + 'static, B: ?Sized + 'static>() -> bool {
    TypeId::of::<A>() == TypeId::of::<B>()
}

/// A proven claim that `expr` has type `expected`, kept for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeContract {
    expr: String,
    #[serde(rename = "type")]
    ty: TypeTag,
}

impl TypeContract {
    /// Contract on a type expression. Does not build unless `A == B`.
    ///
    /// ```compile_fail
    /// use stdconf_harness::TypeContract;
    /// let _ = TypeContract::checked::<<f32 as stdconf_core::Norm>::Output, f64>("norm(x)");
    /// ```
    #[must_use]
    pub fn checked<A, B>(expr: impl Into<String>) -> Self
    where
        A: ?Sized + SameAs<B> + 'static,
        B: ?Sized + 'static,
    {
        Self {
            expr: expr.into(),
            ty: TypeTag::of::<B>(),
        }
    }

    /// Contract on the static type of a value expression. The value is only
    /// borrowed and never inspected. Does not build unless its type is `B`.
    ///
    /// ```compile_fail
    /// use stdconf_core::iterator::IncrementableOverload;
    /// use stdconf_harness::TypeContract;
    /// use stdconf_harness::archetypes::StepCounter;
    /// let _ = TypeContract::checked_val::<IncrementableOverload, _>(
    ///     "resolve_increment_concept!(StepCounter)",
    ///     &stdconf_core::resolve_increment_concept!(StepCounter),
    /// );
    /// ```
    #[must_use]
    pub fn checked_val<B, A>(expr: impl Into<String>, value: &A) -> Self
    where
        A: ?Sized + SameAs<B> + 'static,
        B: ?Sized + 'static,
    {
        let _ = value;
        Self::checked::<A, B>(expr)
    }

    #[must_use]
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The type both sides were proven to share.
    #[must_use]
    pub fn ty(&self) -> TypeTag {
        self.ty
    }
}

/// Compile-time type equality. Fails the build when the types differ.
#[macro_export]
macro_rules! assert_type_eq {
    ($actual:ty, $expected:ty $(,)?) => {
        const _: () = {
            const fn same<A, B>()
            where
                A: ?Sized + $crate::type_contract::SameAs<B>,
                B: ?Sized,
            {
            }
            same::<$actual, $expected>();
        };
    };
}
