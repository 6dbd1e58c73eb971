/// Returns `sequence` rotated left by `amount` positions.
///
/// `result[i] == sequence[(i + amount) mod n]`.  Negative amounts rotate right.
/// An empty sequence is returned unchanged.
pub fn rotate_left<T: Copy>(sequence: &[T], amount: i64) -> Vec<T> {
    let n = sequence.len();
    if n == 0 {
        return Vec::new();
    }
    let shift = amount.rem_euclid(n as i64) as usize;
    sequence[shift..]
        .iter()
        .chain(sequence[..shift].iter())
        .copied()
        .collect()
}
