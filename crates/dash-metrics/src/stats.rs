//! Summary statistics over a report's headline column.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Non-finite values are skipped; `None` when nothing finite remains.
pub fn compute_stats(values: &[f64]) -> Option<ColumnStats> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(f64::total_cmp);

    let (&min, &max) = (finite.first()?, finite.last()?);
    let count = finite.len();
    let total: f64 = finite.iter().sum();
    let mid = count / 2;
    let median = match count % 2 {
        0 => (finite[mid - 1] + finite[mid]) / 2.0,
        _ => finite[mid],
    };

    Some(ColumnStats {
        count,
        total,
        min,
        max,
        mean: total / count as f64,
        median,
    })
}
