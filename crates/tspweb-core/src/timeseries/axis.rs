//! Time axis derivation and lookup

use serde::Serialize;

use crate::datalog::LogTable;

/// Spacings at or below this are treated as a collapsed axis
pub const MIN_SPACING: f64 = 1e-9;

/// How the axis values were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Seconds since the first sample's epoch
    EpochSeconds,
    /// Plain row index (no usable epoch column)
    SampleIndex,
}

/// Shared x axis of a session, one value per row
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    kind: AxisKind,
    values: Vec<f64>,
}

impl TimeAxis {
    /// Axis of plain row indices
    pub fn sample_index(len: usize) -> Self {
        Self {
            kind: AxisKind::SampleIndex,
            values: (0..len).map(|i| i as f64).collect(),
        }
    }

    /// Axis of seconds since the first epoch.
    ///
    /// Degrades to [`TimeAxis::sample_index`] when any epoch is missing or
    /// when the epochs go backwards.
    pub fn from_epoch_ms(epochs: &[Option<f64>]) -> Self {
        let Some(epochs) = epochs.iter().copied().collect::<Option<Vec<f64>>>() else {
            tracing::debug!("epoch column incomplete, using sample index axis");
            return Self::sample_index(epochs.len());
        };

        if epochs.windows(2).any(|w| w[1] < w[0]) {
            tracing::warn!("epoch column is not monotonic, using sample index axis");
            return Self::sample_index(epochs.len());
        }

        let t0 = epochs.first().copied().unwrap_or_default();
        Self {
            kind: AxisKind::EpochSeconds,
            values: epochs.iter().map(|ms| (ms - t0) / 1000.0).collect(),
        }
    }

    /// Derive the axis for a parsed log
    pub fn derive(table: &LogTable, epoch_column: &str) -> Self {
        match table.column_index(epoch_column) {
            Some(col) => Self::from_epoch_ms(&table.column_numbers(col)),
            None => Self::sample_index(table.len()),
        }
    }

    /// How the axis was derived
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Axis values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at an index, clamped into range
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(self.clamp_index(index)).copied()
    }

    /// Clamp an index into `[0, len-1]`
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.values.len().saturating_sub(1))
    }

    /// First and last value
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }

    /// Total span covered by the axis
    pub fn duration(&self) -> f64 {
        self.range().map(|(a, b)| b - a).unwrap_or_default()
    }

    /// Average spacing between samples (1 with fewer than two samples)
    pub fn average_spacing(&self) -> f64 {
        match self.range() {
            Some((first, last)) if self.values.len() >= 2 => {
                (last - first) / (self.values.len() - 1) as f64
            }
            _ => 1.0,
        }
    }

    /// Index of the sample closest to `value`.
    ///
    /// Binary search for the first sample not below `value`, then pick the
    /// closer of it and its predecessor; ties go to the earlier index.
    pub fn nearest_index(&self, value: f64) -> Option<usize> {
        if self.values.is_empty() {
            return None;
        }
        let last = self.values.len() - 1;
        let hi = self.values.partition_point(|&x| x < value).min(last);
        if hi == 0 {
            return Some(0);
        }
        let below = self.values[hi - 1];
        let above = self.values[hi];
        if (value - below).abs() <= (value - above).abs() {
            Some(hi - 1)
        } else {
            Some(hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(values: &[f64]) -> TimeAxis {
        TimeAxis {
            kind: AxisKind::EpochSeconds,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_epoch_axis_starts_at_zero() {
        let a = TimeAxis::from_epoch_ms(&[Some(1_000.0), Some(1_250.0), Some(2_000.0)]);
        assert_eq!(a.kind(), AxisKind::EpochSeconds);
        assert_eq!(a.values(), [0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_missing_epoch_degrades_to_index() {
        let a = TimeAxis::from_epoch_ms(&[Some(1_000.0), None, Some(2_000.0)]);
        assert_eq!(a.kind(), AxisKind::SampleIndex);
        assert_eq!(a.values(), [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_decreasing_epoch_degrades_to_index() {
        let a = TimeAxis::from_epoch_ms(&[Some(5_000.0), Some(4_000.0)]);
        assert_eq!(a.kind(), AxisKind::SampleIndex);
    }

    #[test]
    fn test_average_spacing() {
        assert_eq!(axis(&[0.0, 1.0, 2.0, 3.0, 4.0]).average_spacing(), 1.0);
        assert_eq!(axis(&[0.0, 0.5]).average_spacing(), 0.5);
        assert_eq!(axis(&[7.0]).average_spacing(), 1.0);
        assert_eq!(axis(&[]).average_spacing(), 1.0);
    }

    #[test]
    fn test_nearest_index() {
        let a = axis(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.nearest_index(2.6), Some(3));
        assert_eq!(a.nearest_index(2.4), Some(2));
        assert_eq!(a.nearest_index(2.5), Some(2));
        assert_eq!(a.nearest_index(-10.0), Some(0));
        assert_eq!(a.nearest_index(99.0), Some(4));
        assert_eq!(a.nearest_index(3.0), Some(3));
        assert_eq!(axis(&[]).nearest_index(1.0), None);
    }

    #[test]
    fn test_nearest_index_with_duplicates() {
        let a = axis(&[0.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(a.nearest_index(1.0), Some(1));
        assert_eq!(a.nearest_index(1.2), Some(3));
    }

    #[test]
    fn test_clamp_index() {
        let a = axis(&[0.0, 1.0, 2.0]);
        assert_eq!(a.clamp_index(10), 2);
        assert_eq!(a.value_at(10), Some(2.0));
        assert_eq!(axis(&[]).clamp_index(3), 0);
    }
}
