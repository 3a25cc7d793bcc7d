use std::ops::Range;

/// Splits `len` items into consecutive index ranges of at most `size`.
///
/// A `size` of zero is treated as one, so every item is always scheduled.
pub fn plan_batches(len: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}
