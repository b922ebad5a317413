//! Two-element product type with element-wise converting assignment.
//!
//! `Pair<T1, T2>` can be assigned from any `Pair<U, V>` whose elements are
//! assignable into `T1` and `T2`. Assignment is performed element by element
//! through [`AssignFrom`]; the target pair is never reconstructed.

/// Assign a value of type `Src` into an existing `Self`.
///
/// Implementations for `&Src` model copy-assignment from an lvalue;
/// implementations for an owned `Src` model move-assignment.
pub trait AssignFrom<Src> {
    fn assign_from(&mut self, src: Src);
}

macro_rules! assign_by_conversion {
    ($($src:ty => $($dst:ty),+;)+) => {
        $($(
            impl AssignFrom<&$src> for $dst {
                #[inline]
                fn assign_from(&mut self, src: &$src) {
                    *self = <$dst>::from(*src);
                }
            }

            impl AssignFrom<$src> for $dst {
                #[inline]
                fn assign_from(&mut self, src: $src) {
                    *self = <$dst>::from(src);
                }
            }
        )+)+
    };
}

// Lossless `From` conversions only, plus identity.
assign_by_conversion! {
    bool => bool;
    char => char;
    i8 => i8, i16, i32, i64, f32, f64;
    i16 => i16, i32, i64, f32, f64;
    i32 => i32, i64, f64;
    i64 => i64;
    u8 => u8, u16, u32, u64, i16, i32, i64, f32, f64;
    u16 => u16, u32, u64, i32, i64, f32, f64;
    u32 => u32, u64, i64, f64;
    u64 => u64;
    f32 => f32, f64;
    f64 => f64;
}

/// A pair of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pair<T1, T2> {
    pub first: T1,
    pub second: T2,
}

impl<T1, T2> Pair<T1, T2> {
    #[must_use]
    pub const fn new(first: T1, second: T2) -> Self {
        Self { first, second }
    }

    /// Copy-assign from a pair of convertible element types.
    pub fn assign_from<'a, U, V>(&mut self, other: &'a Pair<U, V>) -> &mut Self
    where
        T1: AssignFrom<&'a U>,
        T2: AssignFrom<&'a V>,
    {
        self.first.assign_from(&other.first);
        self.second.assign_from(&other.second);
        self
    }

    /// Move-assign from a pair of convertible element types.
    pub fn assign_from_owned<U, V>(&mut self, other: Pair<U, V>) -> &mut Self
    where
        T1: AssignFrom<U>,
        T2: AssignFrom<V>,
    {
        self.first.assign_from(other.first);
        self.second.assign_from(other.second);
        self
    }

    #[must_use]
    pub fn into_tuple(self) -> (T1, T2) {
        (self.first, self.second)
    }
}

impl<T1, T2> From<(T1, T2)> for Pair<T1, T2> {
    fn from((first, second): (T1, T2)) -> Self {
        Self::new(first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converting_assignment_widens_each_element() {
        let p1 = Pair::new(3_i32, 4_i16);
        let mut p2: Pair<f64, i64> = Pair::default();
        p2.assign_from(&p1);
        assert_eq!(p2.first, 3.0);
        assert_eq!(p2.second, 4);
        // Source is untouched by copy-assignment.
        assert_eq!(p1, Pair::new(3, 4));
    }

    #[test]
    fn move_assignment_consumes_source() {
        let mut p: Pair<u64, f32> = Pair::new(1, 1.0);
        p.assign_from_owned(Pair::new(7_u8, -2.5_f32));
        assert_eq!(p.into_tuple(), (7, -2.5));
    }

    #[test]
    fn assignment_is_chainable() {
        let mut p: Pair<i64, f64> = Pair::default();
        p.assign_from(&Pair::new(1_i8, 2_i32))
            .assign_from(&Pair::new(5_u32, 0.5_f32));
        assert_eq!(p, Pair::new(5, 0.5));
    }

    #[test]
    fn tuple_conversion() {
        let p: Pair<char, bool> = ('x', true).into();
        assert_eq!(p.first, 'x');
        assert!(p.second);
    }
}
