//! Pairwise Pearson correlation over chosen columns of the table.

use serde::Serialize;

/// A symmetric correlation grid. Row/column order matches the order the
/// columns were requested in; values are mirrored across the diagonal by
/// construction, so repeated computation is bit-identical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn compute(labels: Vec<String>, columns: &[Vec<Option<f64>>]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson_pairwise(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Row-major grid, `values()[i][j]` being the correlation between the
    /// i-th and j-th requested columns.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pearson coefficient over the rows where both values are present.
///
/// Degenerate inputs (fewer than two paired observations, zero variance)
/// yield NaN rather than an error. Rounding can push the ratio a hair past
/// unity, so the result is clamped to [-1, 1].
fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| (*a).zip(*b))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| *a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| *b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        f64::NAN
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}
