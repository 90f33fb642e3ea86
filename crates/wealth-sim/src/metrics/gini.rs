//! Gini Coefficient
//!
//! Inequality of a wealth snapshot. 0.0 means every agent holds the same
//! amount; values near 1.0 mean one agent holds almost everything.

/// Computes the Gini coefficient of the given wealth values.
///
/// Values are sorted ascending into `x`, then
/// `B = sum(x[i] * (n - i)) / (n * S)` and the score is `1 + 1/n - 2B`.
///
/// Input order does not matter. An empty population, or one where nobody
/// holds anything, scores 0.0 since the ratio is undefined there.
pub fn gini(wealths: &[u64]) -> f64 {
    let n = wealths.len();
    if n == 0 {
        return 0.0;
    }

    let total: u128 = wealths.iter().map(|&w| u128::from(w)).sum();
    if total == 0 {
        return 0.0;
    }

    let mut sorted = wealths.to_vec();
    sorted.sort_unstable();

    // Integer accumulation keeps the weighted sum exact for large populations
    let weighted: u128 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| u128::from(w) * (n - i) as u128)
        .sum();

    let n = n as f64;
    let b = weighted as f64 / (n * total as f64);
    1.0 + 1.0 / n - 2.0 * b
}
