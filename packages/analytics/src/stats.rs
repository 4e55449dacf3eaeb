//! Headline statistics for the summary panel.

use depriv_map_analytics_models::SummaryStats;
use depriv_map_geography_models::ComparisonRecord;

/// Computes [`SummaryStats`] over the comparison table.
///
/// Shares are over every row; a row with no difference counts towards
/// none of them. An empty table yields zero shares.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(records: &[ComparisonRecord]) -> SummaryStats {
    let total = records.len();
    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };

    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| Some((r.ppfi_decile? as f64, r.imd_decile? as f64)))
        .collect();

    let within_one = records
        .iter()
        .filter(|r| r.abs_diff.is_some_and(|d| d <= 1))
        .count();
    let negative = records
        .iter()
        .filter(|r| r.diff.is_some_and(|d| d < 0))
        .count();
    let positive = records
        .iter()
        .filter(|r| r.diff.is_some_and(|d| d > 0))
        .count();

    SummaryStats {
        total,
        correlation: pearson(&pairs),
        within_one_share: share(within_one),
        negative_share: share(negative),
        positive_share: share(positive),
    }
}

/// Display lines for the summary panel.
#[must_use]
pub fn summary_lines(stats: &SummaryStats) -> Vec<String> {
    let correlation = stats
        .correlation
        .map_or_else(|| "n/a".to_string(), |c| format!("{c:.2}"));

    vec![
        format!("Number of LSOAs: {}", group_thousands(stats.total)),
        format!("Correlation (PPFI combined decile vs IMD decile): {correlation}"),
        format!(
            "Agreement within \u{b1}1 decile: {:.1}%",
            stats.within_one_share * 100.0
        ),
        format!(
            "PPFI shows higher vulnerability than IMD (negative diff): {:.1}%",
            stats.negative_share * 100.0
        ),
        format!(
            "PPFI shows lower vulnerability than IMD (positive diff): {:.1}%",
            stats.positive_share * 100.0
        ),
    ]
}

#[allow(clippy::cast_precision_loss)]
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ppfi: Option<i64>, imd: Option<i64>) -> ComparisonRecord {
        ComparisonRecord::new("E01".to_string(), None, None, None, ppfi, imd, None)
    }

    #[test]
    fn perfectly_correlated() {
        let records: Vec<_> = (1..=10).map(|d| record(Some(d), Some(d))).collect();
        let stats = summarize(&records);
        assert_eq!(stats.total, 10);
        assert!((stats.correlation.unwrap() - 1.0).abs() < 1e-12);
        assert!((stats.within_one_share - 1.0).abs() < f64::EPSILON);
        assert!(stats.negative_share.abs() < f64::EPSILON);
        assert!(stats.positive_share.abs() < f64::EPSILON);
    }

    #[test]
    fn anti_correlated_with_shares() {
        let records = vec![
            record(Some(1), Some(10)),
            record(Some(10), Some(1)),
            record(Some(5), Some(6)),
            record(Some(6), Some(5)),
        ];
        let stats = summarize(&records);
        assert!(stats.correlation.unwrap() < -0.9);
        assert!((stats.within_one_share - 0.5).abs() < f64::EPSILON);
        assert!((stats.negative_share - 0.5).abs() < f64::EPSILON);
        assert!((stats.positive_share - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn nulls_are_excluded_from_correlation_but_counted() {
        let records = vec![
            record(Some(1), Some(2)),
            record(Some(3), Some(4)),
            record(None, Some(4)),
            record(Some(3), None),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.total, 4);
        assert!((stats.correlation.unwrap() - 1.0).abs() < 1e-12);
        assert!((stats.negative_share - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_tables() {
        let stats = summarize(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.correlation, None);
        assert!(stats.within_one_share.abs() < f64::EPSILON);

        let constant = vec![record(Some(4), Some(1)), record(Some(4), Some(9))];
        assert_eq!(summarize(&constant).correlation, None);
    }

    #[test]
    fn lines_are_formatted() {
        let records: Vec<_> = (0..1234).map(|i| record(Some(i % 10 + 1), Some(5))).collect();
        let lines = summary_lines(&summarize(&records));
        assert_eq!(lines[0], "Number of LSOAs: 1,234");
        assert_eq!(lines[1], "Correlation (PPFI combined decile vs IMD decile): n/a");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(33_755), "33,755");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
    }
}
