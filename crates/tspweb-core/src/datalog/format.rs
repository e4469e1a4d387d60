//! Log file formats
//!
//! Parses reassembled CSV into typed cells and writes session exports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::ReassembledCsv;

/// One parsed CSV field
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A finite number
    Number(f64),
    /// Anything that does not coerce to a finite number
    Text(String),
    /// Empty field, or a field missing from a short row
    Empty,
}

impl Cell {
    /// Coerce a raw field. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if the field is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A parsed session log: named columns over typed rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl LogTable {
    /// Create a table from columns and rows. Rows are padded with
    /// [`Cell::Empty`] or truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the index of a column by name (first match)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a cell by row and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    /// Numeric view of one column; non-numeric cells become `None`
    pub fn column_numbers(&self, col: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(col).and_then(Cell::as_number))
            .collect()
    }
}

/// Parse CSV text with a header row into a [`LogTable`].
///
/// Rows may be shorter or longer than the header; blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<LogTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(LogTable::new(columns, rows))
}

/// Default download name for a session export
pub fn export_file_name(session_id: &str) -> String {
    format!("TSP_ML_{session_id}.csv")
}

/// Write a reassembled session log to a CSV file
pub fn write_csv<P: AsRef<Path>>(path: P, csv: &ReassembledCsv) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", csv.header())?;
    for row in csv.rows() {
        writeln!(writer, "{row}")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalog::{reassemble, LogChunk};

    #[test]
    fn test_cell_coercion() {
        assert_eq!(Cell::parse(" 1.5 "), Cell::Number(1.5));
        assert_eq!(Cell::parse("-3"), Cell::Number(-3.0));
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("   "), Cell::Empty);
        assert_eq!(Cell::parse("resistive"), Cell::Text("resistive".into()));
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN".into()));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let table = parse_csv("a,b,c\n1,2\n4,5,6,7\n").unwrap();
        assert_eq!(table.columns(), ["a", "b", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][2], Cell::Empty);
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.get(1, "c"), Some(&Cell::Number(6.0)));
    }

    #[test]
    fn test_parse_skips_blank_rows() {
        let table = parse_csv("a,b\n1,2\n\n,\n3,4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_numbers(0), vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_write_csv_export() {
        let csv = reassemble(&[
            LogChunk::new("a", "x,y\n1,2\n", 1.0),
            LogChunk::new("b", "x,y\n3,4\n", 2.0),
        ])
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name("s1"));
        write_csv(&path, &csv).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "x,y\n1,2\n3,4\n");
        assert!(path.ends_with("TSP_ML_s1.csv"));
    }
}
