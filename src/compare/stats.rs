//! Descriptive statistics and correlation shared by the paired-value comparators.
//!
//! Every function returns 0.0 on empty input. Standard deviations are
//! population (divide by n) deviations.

use serde::Serialize;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Pearson correlation coefficient.
///
/// When either series is constant (or shorter than two values) the
/// coefficient is undefined; 1.0 is returned for identical series and 0.0
/// otherwise.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return degenerate_correlation(x, y);
    }
    let (x, y) = (&x[..n], &y[..n]);
    if x == y {
        return 1.0;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return degenerate_correlation(x, y);
    }
    (cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0)
}

/// Spearman rank correlation (Pearson over average ranks, ties share their mean rank)
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return degenerate_correlation(x, y);
    }
    pearson(&average_ranks(&x[..n]), &average_ranks(&y[..n]))
}

fn degenerate_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x == y {
        1.0
    } else {
        0.0
    }
}

/// 1-based ranks; tied values receive the mean of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        // positions start..=end hold ranks start+1..=end+1
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        start = end + 1;
    }
    ranks
}

/// Distribution of a set of absolute errors
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Root mean square of the errors
    pub rms: f64,
}

impl ErrorSummary {
    pub fn from_errors(errors: &[f64]) -> Self {
        let rms = if errors.is_empty() {
            0.0
        } else {
            (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt()
        };
        Self {
            count: errors.len(),
            mean: mean(errors),
            median: median(errors),
            std_dev: std_dev(errors),
            min: min(errors),
            max: max(errors),
            rms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_statistics() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&v), 5.0));
        assert!(close(std_dev(&v), 2.0));
        assert!(close(median(&v), 4.5));
        assert_eq!(min(&v), 2.0);
        assert_eq!(max(&v), 9.0);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_empty_statistics_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(min(&[]), 0.0);
        assert_eq!(max(&[]), 0.0);
        let summary = ErrorSummary::from_errors(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.rms, 0.0);
    }

    #[test]
    fn test_pearson_linear() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!(close(pearson(&x, &y), 1.0));
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!(close(pearson(&x, &z), -1.0));
    }

    #[test]
    fn test_pearson_constant_series() {
        assert_eq!(pearson(&[0.5, 0.5], &[0.5, 0.5]), 1.0);
        assert_eq!(pearson(&[0.5, 0.5], &[0.1, 0.9]), 0.0);
        assert_eq!(pearson(&[], &[]), 1.0);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn test_spearman_monotonic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 4.0, 9.0, 16.0, 100.0];
        assert!(close(spearman(&x, &y), 1.0));
        assert!(pearson(&x, &y) < 1.0);
    }

    #[test]
    fn test_error_summary_rms() {
        let summary = ErrorSummary::from_errors(&[3.0, 4.0]);
        assert!(close(summary.mean, 3.5));
        assert!(close(summary.rms, (12.5f64).sqrt()));
        assert!(summary.mean <= summary.rms);
    }
}
