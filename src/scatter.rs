//! Checksum-seeded positional shuffle.
//!
//! The shift used at every step is `spin ^ sum`, where `sum` is the digit sum of the whole
//! sequence.  Reordering digits does not change their sum, so [`unscatter`] can recompute
//! the same shift from the scattered output.

use crate::rotate::rotate_left;

fn shift(digits: &[u8], spin: i64) -> i64 {
    let sum: i64 = digits.iter().map(|&d| d as i64).sum();
    spin ^ sum
}

/// Shuffles digit positions.
///
/// Each of the `length` steps rotates the remaining digits left by the shift and moves the
/// last one to the output.  `length` is capped at `digits.len()`; pass the full length to
/// get a permutation of `digits`.
pub fn scatter(digits: &[u8], spin: i64, length: usize) -> Vec<u8> {
    let shift = shift(digits, spin);
    let steps = length.min(digits.len());
    let mut remaining = digits.to_vec();
    let mut scattered = Vec::with_capacity(steps);
    for _ in 0..steps {
        let mut rotated = rotate_left(&remaining, shift);
        if let Some(digit) = rotated.pop() {
            scattered.push(digit);
        }
        remaining = rotated;
    }
    scattered
}

/// Inverts [`scatter`] for a full-length scatter.
///
/// Digits are taken from the end of `encoded`, appended to the rebuilt sequence, and the
/// rebuilt sequence is rotated back by the negated shift.
pub fn unscatter(encoded: &[u8], spin: i64) -> Vec<u8> {
    let shift = shift(encoded, spin);
    let mut rebuilt: Vec<u8> = Vec::with_capacity(encoded.len());
    for &digit in encoded.iter().rev() {
        rebuilt.push(digit);
        // Reduce before negating, `-i64::MIN` does not exist.
        let back = -shift.rem_euclid(rebuilt.len() as i64);
        rebuilt = rotate_left(&rebuilt, back);
    }
    rebuilt
}
