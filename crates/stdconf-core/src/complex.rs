//! Complex numbers and the arithmetic `norm` overloads.
//!
//! `norm` of a real argument is its squared magnitude. Integral arguments are
//! promoted to `f64`; floating-point arguments keep their own type. The
//! `norm_*` const functions expose the same computations for compile-time
//! evaluation.

use core::ops::{Add, Mul};

/// A complex number with real part `re` and imaginary part `im`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    #[must_use]
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T> Complex<T>
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
{
    /// Squared magnitude `re * re + im * im`.
    #[must_use]
    pub fn norm(self) -> T {
        self.re * self.re + self.im * self.im
    }
}

macro_rules! const_complex_norm {
    ($($t:ty),+) => {
        $(
            impl Complex<$t> {
                /// Squared magnitude, usable in const contexts.
                #[must_use]
                pub const fn const_norm(self) -> $t {
                    self.re * self.re + self.im * self.im
                }
            }
        )+
    };
}

const_complex_norm!(f32, f64);

/// Arithmetic `norm` overload set.
pub trait Norm {
    /// Result type: `f64` for integral types, `Self` for floating-point types.
    type Output;

    fn norm(self) -> Self::Output;
}

/// `norm(x)` for any arithmetic `x`.
pub fn norm<T: Norm>(x: T) -> T::Output {
    x.norm()
}

macro_rules! integral_norm {
    ($($t:ty => $const_fn:ident),+ $(,)?) => {
        $(
            impl Norm for $t {
                type Output = f64;

                #[inline]
                fn norm(self) -> f64 {
                    $const_fn(self)
                }
            }

            #[doc = concat!("`norm` of a `", stringify!($t), "`, promoted to `f64`.")]
            #[must_use]
            pub const fn $const_fn(x: $t) -> f64 {
                let v = x as f64;
                v * v
            }
        )+
    };
}

macro_rules! floating_norm {
    ($($t:ty => $const_fn:ident),+ $(,)?) => {
        $(
            impl Norm for $t {
                type Output = $t;

                #[inline]
                fn norm(self) -> $t {
                    $const_fn(self)
                }
            }

            #[doc = concat!("`norm` of a `", stringify!($t), "`.")]
            #[must_use]
            pub const fn $const_fn(x: $t) -> $t {
                x * x
            }
        )+
    };
}

integral_norm! {
    i8 => norm_i8,
    i16 => norm_i16,
    i32 => norm_i32,
    i64 => norm_i64,
    isize => norm_isize,
    u8 => norm_u8,
    u16 => norm_u16,
    u32 => norm_u32,
    u64 => norm_u64,
    usize => norm_usize,
}

floating_norm! {
    f32 => norm_f32,
    f64 => norm_f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_norm_is_squared_magnitude() {
        assert_eq!(Complex::new(3.0_f64, 4.0).norm(), 25.0);
        assert_eq!(Complex::new(3_i32, -4).norm(), 25);
        assert_eq!(Complex::new(-1.5_f32, 0.0).const_norm(), 2.25);
    }

    #[test]
    fn integral_norm_promotes_to_double() {
        let n: f64 = norm(10_i32);
        assert_eq!(n, 100.0);
        assert_eq!(norm(10_u32), Complex::new(10.0_f64, 0.0).norm());
        assert_eq!(norm(-3_i64), 9.0);
    }

    #[test]
    fn floating_norm_keeps_type() {
        let n: f32 = norm(1.5_f32);
        assert_eq!(n, 2.25);
        assert_eq!(norm(0.0_f64), 0.0);
    }

    #[test]
    fn const_evaluation_matches_runtime() {
        const TEN: f64 = norm_i32(10);
        assert_eq!(TEN, norm(10_i32));
        const HALF: f32 = norm_f32(0.5);
        assert_eq!(HALF, norm(0.5_f32));
    }
}
