//! Wealth Distribution
//!
//! Histogram and summary statistics for a wealth snapshot.

use serde::Serialize;
use std::collections::BTreeMap;
use wealth_records::HistogramBin;

/// Summary statistics for one snapshot
///
/// `total` saturates at `u64::MAX`; `mean` is computed from the exact sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WealthStats {
    pub count: usize,
    pub total: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub top_decile_share: f64,
}

/// Counts agents per distinct wealth value, ascending by wealth.
pub fn histogram(wealths: &[u64]) -> Vec<HistogramBin> {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for &w in wealths {
        *counts.entry(w).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(wealth, count)| HistogramBin { wealth, count })
        .collect()
}

/// Fraction of total wealth held by the richest `fraction` of agents.
///
/// The group size is rounded up, so any non-empty population has at least
/// one agent in it. Returns 0.0 when nobody holds anything.
pub fn top_share(wealths: &[u64], fraction: f64) -> f64 {
    let total: u128 = wealths.iter().map(|&w| u128::from(w)).sum();
    if wealths.is_empty() || total == 0 {
        return 0.0;
    }

    let fraction = fraction.clamp(0.0, 1.0);
    let group = ((wealths.len() as f64 * fraction).ceil() as usize).clamp(1, wealths.len());

    let mut sorted = wealths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let held: u128 = sorted.iter().take(group).map(|&w| u128::from(w)).sum();

    held as f64 / total as f64
}

/// Computes summary statistics for a snapshot.
pub fn summarize(wealths: &[u64]) -> WealthStats {
    if wealths.is_empty() {
        return WealthStats::default();
    }

    let mut sorted = wealths.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let exact: u128 = sorted.iter().map(|&w| u128::from(w)).sum();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    };

    WealthStats {
        count,
        total: u64::try_from(exact).unwrap_or(u64::MAX),
        min: sorted[0],
        max: sorted[count - 1],
        mean: exact as f64 / count as f64,
        median,
        top_decile_share: top_share(&sorted, 0.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wealth_records::fixtures;

    #[test]
    fn test_histogram_counts() {
        let bins = histogram(&[2, 0, 1, 0, 0, 2]);
        assert_eq!(
            bins,
            vec![
                HistogramBin { wealth: 0, count: 3 },
                HistogramBin { wealth: 1, count: 1 },
                HistogramBin { wealth: 2, count: 2 },
            ]
        );
        assert!(histogram(&[]).is_empty());
    }

    #[test]
    fn test_top_share() {
        let wealths = [0, 0, 0, 0, 0, 0, 0, 0, 0, 10];
        assert_eq!(top_share(&wealths, 0.1), 1.0);

        let equal = [1u64; 10];
        assert!((top_share(&equal, 0.1) - 0.1).abs() < 1e-12);
        assert!((top_share(&equal, 0.5) - 0.5).abs() < 1e-12);

        assert_eq!(top_share(&[0, 0], 0.5), 0.0);
        assert_eq!(top_share(&[], 0.5), 0.0);
    }

    #[test]
    fn test_top_share_rounds_group_up() {
        // 10% of 5 agents rounds up to one agent
        assert!((top_share(&[1, 1, 1, 1, 4], 0.1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_summarize() {
        let stats = summarize(&[3, 1, 0, 4]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 8);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 4);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.top_decile_share, 0.5);

        let odd = summarize(&[5, 1, 3]);
        assert_eq!(odd.median, 3.0);
    }

    #[test]
    fn test_summarize_large_values_do_not_overflow() {
        let stats = summarize(&[u64::MAX, 1]);
        assert_eq!(stats.total, u64::MAX);
        assert_eq!(stats.max, u64::MAX);
        assert_eq!(stats.min, 1);
        assert!((stats.mean - u64::MAX as f64 / 2.0).abs() / stats.mean < 1e-12);
        assert_eq!(stats.top_decile_share, 1.0);
    }

    #[test]
    fn test_summarize_sample_snapshot() {
        let snapshot = fixtures::sample_snapshot();
        let stats = summarize(&snapshot.wealths);
        assert_eq!(stats.count, snapshot.len());
        assert_eq!(stats.total, snapshot.total());
        assert_eq!(histogram(&snapshot.wealths).iter().map(|b| b.count).sum::<usize>(), snapshot.len());
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), WealthStats::default());
    }
}
