//! # BitSet - Square Sets as 64-bit Integers
//!
//! Every board in the engine is a plain `u64` where bit *i* stands for square
//! *i* (`a1 = 0`, `h8 = 63`). `BitSet` wraps such a value when code needs to
//! walk the set squares: it is an iterator that pops the least significant bit
//! on each step, so `for sq in BitSet(knights)` visits every knight once.
//!
//! ## Operations
//!
//! - **Insert**: `bits |= 1 << square`
//! - **Remove**: `bits &= !(1 << square)`
//! - **Contains**: `bits & (1 << square) != 0`
//! - **Count**: `bits.count_ones()` (hardware POPCNT)
//! - **Pop**: `bits.trailing_zeros()` then `bits &= bits - 1`

use crate::types::Square;

/// Single-bit mask of a square
#[inline]
pub const fn bit(square: Square) -> u64 {
    1u64 << square
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitSet(pub u64);

impl BitSet {
    pub fn new() -> Self {
        BitSet(0)
    }

    #[inline]
    pub fn insert(&mut self, square: Square) {
        self.0 |= bit(square);
    }

    #[inline]
    pub fn remove(&mut self, square: Square) {
        self.0 &= !bit(square);
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        self.0 & bit(square) != 0
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Lowest set square, if any
    #[inline]
    pub fn first(&self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as Square)
        }
    }
}

impl Iterator for BitSet {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let square = self.first()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitSet {}
