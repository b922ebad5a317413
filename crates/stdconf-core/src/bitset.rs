//! Fixed-size bit sequences: `Bitset<N>`.
//!
//! Bits are packed little-endian into 64-bit words. Bits at positions `>= N`
//! in the last word are always zero; every operation that could set them
//! (`!`, [`Bitset::all`], [`Bitset::from_words`]) masks them off again.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

const WORD_BITS: usize = u64::BITS as usize;

/// Error returned by position-checked accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitsetError {
    /// Position is not below the bitset length.
    OutOfRange { pos: usize, len: usize },
}

impl fmt::Display for BitsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { pos, len } => {
                write!(f, "bit position {pos} out of range for bitset of {len} bits")
            }
        }
    }
}

impl std::error::Error for BitsetError {}

/// A sequence of exactly `N` bits.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitset<const N: usize> {
    words: Vec<u64>,
}

impl<const N: usize> Bitset<N> {
    /// Number of 64-bit storage words backing an `N`-bit set.
    pub const WORDS: usize = N.div_ceil(WORD_BITS);

    const TAIL_MASK: u64 = if N % WORD_BITS == 0 {
        u64::MAX
    } else {
        (1u64 << (N % WORD_BITS)) - 1
    };

    /// All bits cleared.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: vec![0; Self::WORDS],
        }
    }

    /// All `N` bits set.
    #[must_use]
    pub fn all() -> Self {
        let mut set = Self {
            words: vec![u64::MAX; Self::WORDS],
        };
        set.clear_tail();
        set
    }

    /// Build from little-endian storage words. Missing words are zero, extra
    /// words and bits beyond `N` are discarded.
    #[must_use]
    pub fn from_words(words: &[u64]) -> Self {
        let mut set = Self::new();
        for (dst, src) in set.words.iter_mut().zip(words) {
            *dst = *src;
        }
        set.clear_tail();
        set
    }

    /// Number of bits, always `N`.
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Backing storage words.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Read bit `pos`.
    pub fn test(&self, pos: usize) -> Result<bool, BitsetError> {
        self.check(pos)?;
        Ok((self.words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1 == 1)
    }

    /// Write bit `pos`.
    pub fn set(&mut self, pos: usize, value: bool) -> Result<&mut Self, BitsetError> {
        self.check(pos)?;
        let mask = 1u64 << (pos % WORD_BITS);
        let word = &mut self.words[pos / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(self)
    }

    /// Invert bit `pos`.
    pub fn flip(&mut self, pos: usize) -> Result<&mut Self, BitsetError> {
        self.check(pos)?;
        self.words[pos / WORD_BITS] ^= 1u64 << (pos % WORD_BITS);
        Ok(self)
    }

    /// Invert every bit in place.
    pub fn flip_all(&mut self) -> &mut Self {
        for word in &mut self.words {
            *word = !*word;
        }
        self.clear_tail();
        self
    }

    /// Clear every bit in place.
    pub fn reset_all(&mut self) -> &mut Self {
        self.words.fill(0);
        self
    }

    /// Number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if any bit is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// True if no bit is set. Vacuously true for `N == 0`.
    #[must_use]
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// True if every bit is set. Vacuously true for `N == 0`.
    #[must_use]
    pub fn all_set(&self) -> bool {
        self.count() == N
    }

    fn check(&self, pos: usize) -> Result<(), BitsetError> {
        if pos < N {
            Ok(())
        } else {
            Err(BitsetError::OutOfRange { pos, len: N })
        }
    }

    fn clear_tail(&mut self) {
        if let Some(last) = self.words.last_mut() {
            *last &= Self::TAIL_MASK;
        }
    }
}

impl<const N: usize> Default for Bitset<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders most-significant bit first, one `0`/`1` character per bit.
impl<const N: usize> fmt::Display for Bitset<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in (0..N).rev() {
            let bit = (self.words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1;
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Bitset<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitset<{N}>({self})")
    }
}

macro_rules! bitwise_op {
    ($op_trait:ident, $op_method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<const N: usize> $assign_trait<&Bitset<N>> for Bitset<N> {
            fn $assign_method(&mut self, rhs: &Bitset<N>) {
                for (lhs, rhs) in self.words.iter_mut().zip(&rhs.words) {
                    *lhs = *lhs $op *rhs;
                }
            }
        }

        impl<const N: usize> $assign_trait for Bitset<N> {
            fn $assign_method(&mut self, rhs: Bitset<N>) {
                <Self as $assign_trait<&Bitset<N>>>::$assign_method(self, &rhs);
            }
        }

        impl<const N: usize> $op_trait<&Bitset<N>> for &Bitset<N> {
            type Output = Bitset<N>;

            fn $op_method(self, rhs: &Bitset<N>) -> Bitset<N> {
                let mut out = self.clone();
                <Bitset<N> as $assign_trait<&Bitset<N>>>::$assign_method(&mut out, rhs);
                out
            }
        }

        impl<const N: usize> $op_trait for Bitset<N> {
            type Output = Bitset<N>;

            fn $op_method(mut self, rhs: Bitset<N>) -> Bitset<N> {
                <Bitset<N> as $assign_trait<&Bitset<N>>>::$assign_method(&mut self, &rhs);
                self
            }
        }
    };
}

bitwise_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);
bitwise_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitwise_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);

impl<const N: usize> Not for &Bitset<N> {
    type Output = Bitset<N>;

    fn not(self) -> Bitset<N> {
        let mut out = self.clone();
        out.flip_all();
        out
    }
}

impl<const N: usize> Not for Bitset<N> {
    type Output = Bitset<N>;

    fn not(mut self) -> Bitset<N> {
        self.flip_all();
        self
    }
}
