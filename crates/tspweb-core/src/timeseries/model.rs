//! Time-series model builder

use std::sync::Arc;

use super::{Representation, SeriesData, TimeAxis};
use crate::config::ViewerConfig;
use crate::datalog::{Cell, LogTable};

/// Column selection rules for building a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Millisecond epoch column that drives the time axis
    pub epoch_column: String,
    /// Identifier/metadata columns never plotted
    pub excluded_columns: Vec<String>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ModelOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            epoch_column: config.epoch_column.clone(),
            excluded_columns: config.excluded_columns.clone(),
        }
    }
}

impl ModelOptions {
    fn is_excluded(&self, column: &str) -> bool {
        column == self.epoch_column || self.excluded_columns.iter().any(|c| c == column)
    }
}

/// Typed, plot-ready view of a session log
#[derive(Debug, Clone)]
pub struct TimeSeriesModel {
    axis: Arc<TimeAxis>,
    series: Vec<SeriesData>,
}

impl TimeSeriesModel {
    /// Build the axis and every plottable series from a parsed log.
    ///
    /// A column is plottable when its first row holds a number and it is not
    /// an excluded identifier column.
    pub fn build(table: &LogTable, options: &ModelOptions) -> Self {
        let axis = Arc::new(TimeAxis::derive(table, &options.epoch_column));

        let series = match table.rows().first() {
            Some(first) => table
                .columns()
                .iter()
                .enumerate()
                .filter(|(col, name)| {
                    !options.is_excluded(name) && matches!(first.get(*col), Some(Cell::Number(_)))
                })
                .map(|(col, name)| SeriesData::new(name.clone(), table.column_numbers(col)))
                .collect(),
            None => Vec::new(),
        };

        tracing::debug!(
            rows = table.len(),
            series = series.len(),
            axis = ?axis.kind(),
            "built time-series model"
        );

        Self { axis, series }
    }

    /// Shared time axis
    pub fn axis(&self) -> &Arc<TimeAxis> {
        &self.axis
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// All plottable series, in column order
    pub fn series(&self) -> &[SeriesData] {
        &self.series
    }

    /// Series keys, in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(SeriesData::key)
    }

    /// Find the index of a series by key
    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key() == key)
    }

    /// Find a series by key
    pub fn series_by_key(&self, key: &str) -> Option<&SeriesData> {
        self.series.iter().find(|s| s.key() == key)
    }

    /// Values of one series in the requested representation
    pub fn values(&self, index: usize, representation: Representation) -> &[Option<f64>] {
        match (self.series.get(index), representation) {
            (Some(s), Representation::Raw) => s.raw(),
            (Some(s), Representation::Normalized) => s.normalized(),
            (None, _) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalog::parse_csv;
    use crate::timeseries::AxisKind;

    fn build(csv: &str) -> TimeSeriesModel {
        TimeSeriesModel::build(&parse_csv(csv).unwrap(), &ModelOptions::default())
    }

    #[test]
    fn test_excluded_and_text_columns_not_plotted() {
        let model = build(
            "timestamp,epoch_ms,session_id,load_type,v_rms,note,i_rms\n\
             2026-01-01T00:00:00,1000,s1,kettle,230.1,ok,1.5\n\
             2026-01-01T00:00:01,2000,s1,kettle,229.8,ok,1.6\n",
        );
        let keys: Vec<&str> = model.keys().collect();
        assert_eq!(keys, ["v_rms", "i_rms"]);
        assert_eq!(model.axis().kind(), AxisKind::EpochSeconds);
        assert_eq!(model.axis().values(), [0.0, 1.0]);
    }

    #[test]
    fn test_numeric_session_id_still_excluded() {
        let model = build("session_id,x\n42,1\n");
        assert_eq!(model.keys().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn test_series_selected_by_first_row() {
        let model = build("a,b\n,1\n2,3\n");
        assert_eq!(model.keys().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_series_align_with_axis() {
        let model = build("x,y\n1,2\nbad,4\n3,\n");
        assert_eq!(model.len(), 3);
        assert_eq!(model.axis().kind(), AxisKind::SampleIndex);
        for s in model.series() {
            assert_eq!(s.raw().len(), model.len());
            assert_eq!(s.normalized().len(), model.len());
        }
        let x = model.series_by_key("x").unwrap();
        assert_eq!(x.raw(), [Some(1.0), None, Some(3.0)]);
        assert_eq!(x.normalized(), [Some(0.0), None, Some(1.0)]);
    }

    #[test]
    fn test_values_by_representation() {
        let model = build("x\n1\n3\n");
        assert_eq!(model.values(0, Representation::Raw), [Some(1.0), Some(3.0)]);
        assert_eq!(
            model.values(0, Representation::Normalized),
            [Some(0.0), Some(1.0)]
        );
        assert!(model.values(5, Representation::Raw).is_empty());
    }
}
