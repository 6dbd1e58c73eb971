//! Per-position digit substitution.
//!
//! Every digit position gets its own substitution table, selected by the position and the
//! spin.  The table for `(pos, spin)` maps digit `d` to the last element of the digit
//! alphabet rotated left by `(pos + d) ^ spin`, which is `(9 + ((pos + d) ^ spin)) mod 10`.
//!
//! The construction is not a permutation for every spin (for example spin 5 at position 0
//! maps both 6 and 8 to 2), so callers that need to decode must check the spin with
//! [`validate_spin`] first.  [`crate::Cipher`] does this when it is created.

use crate::error::{ConfigError, Error};
use crate::rotate::rotate_left;

const ALPHABET: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Substitutes the digit `digit` at position `pos`.
fn substitute(pos: usize, digit: u8, spin: i64) -> u8 {
    let shift = (pos as i64 + digit as i64) ^ spin;
    let rotated = rotate_left(&ALPHABET, shift);
    rotated[ALPHABET.len() - 1]
}

/// Builds the substitution table for position `pos`.
pub fn table(pos: usize, spin: i64) -> [u8; 10] {
    let mut table = [0u8; 10];
    for (digit, slot) in table.iter_mut().enumerate() {
        *slot = substitute(pos, digit as u8, spin);
    }
    table
}

/// Returns true if the table for `(pos, spin)` is a permutation of the digits.
pub fn is_bijective(pos: usize, spin: i64) -> bool {
    let mut seen = [false; 10];
    for value in table(pos, spin) {
        if seen[value as usize] {
            return false;
        }
        seen[value as usize] = true;
    }
    true
}

/// Checks that every position in `0..width` has a bijective table for `spin`.
pub fn validate_spin(spin: i64, width: usize) -> Result<(), ConfigError> {
    match (0..width).find(|&pos| !is_bijective(pos, spin)) {
        Some(position) => Err(ConfigError::NonBijectiveSpin { spin, position }),
        None => Ok(()),
    }
}

/// Substitutes each digit using the table of its position.
pub fn swap(digits: &[u8], spin: i64) -> Vec<u8> {
    digits
        .iter()
        .enumerate()
        .map(|(pos, &digit)| substitute(pos, digit, spin))
        .collect()
}

/// Inverts [`swap`] by searching each position's table.
///
/// When a table maps several digits to the same value the last one wins, which matches
/// what the forward direction can be inverted to at best.  A value with no preimage is
/// an error.
pub fn unswap(encoded: &[u8], spin: i64) -> Result<Vec<u8>, Error> {
    encoded
        .iter()
        .enumerate()
        .map(|(pos, &digit)| {
            table(pos, spin)
                .iter()
                .rposition(|&value| value == digit)
                .map(|d| d as u8)
                .ok_or(Error::NotInvertible {
                    position: pos,
                    digit,
                })
        })
        .collect()
}

/// Spins accepted by [`validate_spin`] at full width: those that are 0, 1, 30 or 31 mod 32.
#[cfg(test)]
pub(crate) fn usable_spin() -> impl proptest::strategy::Strategy<Value = i64> {
    use proptest::prelude::*;

    (any::<i64>(), prop::sample::select(vec![0i64, 1, 30, 31]))
        .prop_map(|(high, low)| (high & !31) | low)
}
