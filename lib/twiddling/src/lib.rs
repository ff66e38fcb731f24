//! # lib.rs
//!
//! Bit twiddling helpers for fixed-width occupancy words.
//!
//! This crate wraps the handful of `U4096` operations the engine needs when
//! it tracks which tiles are occupied by which side: setting, clearing and
//! testing single bits, counting, and iterating over the set bit indices in
//! ascending order.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use bnum::types::U4096;

/// Number of addressable bits in an occupancy word.
pub const WORD_BITS: u32 = 4096;

pub fn set_bit(x: &mut U4096, i: u32) {
    debug_assert!(i < WORD_BITS, "Bit {i} out of range");
    x.set_bit(i, true);
}

pub fn clear_bit(x: &mut U4096, i: u32) {
    debug_assert!(i < WORD_BITS, "Bit {i} out of range");
    x.set_bit(i, false);
}

pub fn get_bit(x: &U4096, i: u32) -> bool {
    i < WORD_BITS && x.bit(i)
}

pub fn count_bits(x: &U4096) -> u32 {
    x.count_ones()
}

/// Index of the least significant set bit, `None` for an empty word.
pub fn lsb(x: &U4096) -> Option<u32> {
    if *x == U4096::ZERO {
        None
    } else {
        Some(x.trailing_zeros())
    }
}

/// Clears the least significant set bit and returns its index.
pub fn pop_lsb(x: &mut U4096) -> Option<u32> {
    let index = lsb(x)?;
    *x &= *x - U4096::ONE;                                                      /* Drop the lowest set bit            */
    Some(index)
}

/// Collects the indices of all set bits, lowest first.
pub fn bit_indices(x: &U4096) -> Vec<u32> {
    let mut bits = *x;
    let mut indices = Vec::with_capacity(count_bits(x) as usize);

    while let Some(index) = pop_lsb(&mut bits) {
        indices.push(index);
    }

    indices
}
