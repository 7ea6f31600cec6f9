//! Balance-oriented split scoring.
//!
//! There are no labels to measure purity against, so a split is scored from its
//! sizes alone: the binary entropy of the split proportion minus the
//! size-weighted entropy of each side measured against its complement.

/// Binary entropy of two counts, in bits. Zero when either count is zero.
#[must_use]
pub fn entropy(a: usize, b: usize) -> f64 {
    let total = a + b;
    if total == 0 {
        return 0.0;
    }
    let mut h = 0.0;
    for count in [a, b] {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total as f64;
        h -= p * p.log2();
    }
    h
}

/// Gain of splitting `total` candidates into `left` and `right`.
///
/// Never negative. The arithmetic order is fixed so that near-zero results
/// compare identically across runs; question selection breaks ties on them.
#[must_use]
pub fn balance_gain(total: usize, left: usize, right: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let parent = entropy(left, right);
    let child_left = entropy(left, total.saturating_sub(left));
    let child_right = entropy(right, total.saturating_sub(right));
    let n = total as f64;
    let weighted = (left as f64 / n) * child_left + (right as f64 / n) * child_right;
    (parent - weighted).max(0.0)
}
