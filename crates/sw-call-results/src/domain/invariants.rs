//! # Domain Invariants
//!
//! Checks the driver and the layout tables rely on.

use std::time::Duration;

/// A request has timed out once its elapsed time is strictly greater than its
/// timeout. A request exactly at its limit is polled one more time.
pub fn invariant_timed_out(elapsed: Duration, timeout: Duration) -> bool {
    elapsed > timeout
}

/// Every field of a fixed record lies inside the record and no two fields
/// overlap. `fields` are `(offset, width)` pairs.
pub fn invariant_fields_fit(size: usize, fields: &[(usize, usize)]) -> bool {
    let mut sorted = fields.to_vec();
    sorted.sort_unstable();

    let inside = sorted.iter().all(|&(offset, width)| offset + width <= size);
    let disjoint = sorted
        .windows(2)
        .all(|pair| pair[0].0 + pair[0].1 <= pair[1].0);

    inside && disjoint
}
