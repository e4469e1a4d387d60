//! Per-series value arrays and normalization

use serde::Serialize;

/// Spreads at or below this normalize to a flat zero line
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Summary statistics over the non-null samples of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Smallest sample
    pub min: Option<f64>,
    /// Largest sample
    pub max: Option<f64>,
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Number of non-null samples
    pub count: usize,
    /// Number of null samples
    pub nulls: usize,
}

impl SeriesStats {
    /// Compute statistics, skipping nulls
    pub fn compute(values: &[Option<f64>]) -> Self {
        let mut stats = SeriesStats::default();
        let mut sum = 0.0;
        for v in values {
            match v {
                Some(v) => {
                    stats.min = Some(stats.min.map_or(*v, |m| m.min(*v)));
                    stats.max = Some(stats.max.map_or(*v, |m| m.max(*v)));
                    sum += v;
                    stats.count += 1;
                }
                None => stats.nulls += 1,
            }
        }
        if stats.count > 0 {
            stats.mean = Some(sum / stats.count as f64);
        }
        stats
    }

    /// `max - min`, if any sample exists
    pub fn spread(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }
}

/// Min/max normalize a series into `[0, 1]`.
///
/// Nulls stay null. A series whose spread does not exceed
/// [`NORMALIZE_EPSILON`] maps every sample to `0.0`.
pub fn normalize(raw: &[Option<f64>]) -> Vec<Option<f64>> {
    let stats = SeriesStats::compute(raw);
    let min = stats.min.unwrap_or_default();
    let spread = stats.spread().unwrap_or_default();

    raw.iter()
        .map(|v| {
            v.map(|v| {
                if spread > NORMALIZE_EPSILON {
                    (v - min) / spread
                } else {
                    0.0
                }
            })
        })
        .collect()
}

/// One plottable measurement column
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    key: String,
    raw: Vec<Option<f64>>,
    normalized: Vec<Option<f64>>,
    stats: SeriesStats,
}

impl SeriesData {
    /// Build a series from its raw samples
    pub fn new(key: impl Into<String>, raw: Vec<Option<f64>>) -> Self {
        let stats = SeriesStats::compute(&raw);
        let normalized = normalize(&raw);
        Self {
            key: key.into(),
            raw,
            normalized,
            stats,
        }
    }

    /// Column name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw samples
    pub fn raw(&self) -> &[Option<f64>] {
        &self.raw
    }

    /// Normalized samples
    pub fn normalized(&self) -> &[Option<f64>] {
        &self.normalized
    }

    /// Statistics over the raw samples
    pub fn stats(&self) -> &SeriesStats {
        &self.stats
    }

    /// Raw sample at an index
    pub fn raw_at(&self, index: usize) -> Option<f64> {
        self.raw.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_linear() {
        assert_eq!(
            normalize(&[Some(1.0), Some(2.0), Some(3.0)]),
            vec![Some(0.0), Some(0.5), Some(1.0)]
        );
    }

    #[test]
    fn test_normalize_flat_series() {
        assert_eq!(
            normalize(&[Some(5.0), Some(5.0), Some(5.0)]),
            vec![Some(0.0), Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn test_normalize_keeps_nulls() {
        assert_eq!(
            normalize(&[None, Some(10.0), None, Some(20.0)]),
            vec![None, Some(0.0), None, Some(1.0)]
        );
        assert_eq!(normalize(&[None, None]), vec![None, None]);
    }

    #[test]
    fn test_stats_skip_nulls() {
        let stats = SeriesStats::compute(&[Some(2.0), None, Some(4.0)]);
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.mean, Some(3.0));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.nulls, 1);
        assert_eq!(SeriesStats::compute(&[None]).spread(), None);
    }
}
