/// Running sums of per-channel samples.
///
/// One channel per observable (e.g. magnetization and energy); every
/// `update` pushes one sample into each channel.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub count: usize,
    pub aggregate: Vec<f64>,
}

impl Statistics {
    pub fn new(n_channels: usize) -> Self {
        Self {
            count: 0,
            aggregate: vec![0.0; n_channels],
        }
    }

    pub fn update(&mut self, values: &[f64]) {
        self.count += 1;
        for (agg, &v) in self.aggregate.iter_mut().zip(values.iter()) {
            *agg += v;
        }
    }

    /// Per-channel mean, or `None` before the first sample.
    pub fn average(&self) -> Option<Vec<f64>> {
        if self.count == 0 {
            return None;
        }
        let c = self.count as f64;
        Some(self.aggregate.iter().map(|&a| a / c).collect())
    }
}

/// Mean of each column of a row-major matrix.
pub fn column_mean(rows: &[Vec<f64>]) -> Vec<f64> {
    let n_cols = rows.first().map_or(0, |r| r.len());
    if rows.is_empty() {
        return vec![];
    }
    let n = rows.len() as f64;
    (0..n_cols)
        .map(|c| rows.iter().map(|r| r[c]).sum::<f64>() / n)
        .collect()
}

/// Population variance (`ddof = 0`) of each column of a row-major matrix.
pub fn column_variance(rows: &[Vec<f64>]) -> Vec<f64> {
    let means = column_mean(rows);
    let n = rows.len() as f64;
    means
        .iter()
        .enumerate()
        .map(|(c, &mean)| rows.iter().map(|r| (r[c] - mean).powi(2)).sum::<f64>() / n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_per_channel() {
        let mut s = Statistics::new(2);
        s.update(&[1.0, -10.0]);
        s.update(&[0.5, -20.0]);
        let avg = s.average().unwrap();
        assert_eq!(avg, vec![0.75, -15.0]);
    }

    #[test]
    fn test_empty_average_is_none() {
        let s = Statistics::new(2);
        assert!(s.average().is_none());
    }

    #[test]
    fn test_column_variance() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 2.0]];
        assert_eq!(column_mean(&rows), vec![2.0, 2.0]);
        assert_eq!(column_variance(&rows), vec![1.0, 0.0]);
    }

    #[test]
    fn test_single_row_has_zero_variance() {
        let rows = vec![vec![0.3, -1.7, 4.2]];
        assert_eq!(column_variance(&rows), vec![0.0, 0.0, 0.0]);
    }
}
