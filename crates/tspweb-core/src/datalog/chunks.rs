//! Chunk reassembly
//!
//! A device flushes its log buffer as many small CSV blobs, most of which
//! repeat the header line. Reassembly turns them back into one document.

use super::LogChunk;

/// A session log stitched back together from its chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassembledCsv {
    header: String,
    rows: Vec<String>,
}

impl ReassembledCsv {
    /// The canonical header line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Data lines, in chunk order
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of data lines
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as a single CSV document with exactly one header line
    pub fn to_csv_string(&self) -> String {
        let capacity = self.header.len() + 1 + self.rows.iter().map(|r| r.len() + 1).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.header);
        out.push('\n');
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}

/// Reassemble a session's chunks into one CSV document.
///
/// Chunks are ordered by `created_at` (store key breaks ties). The first
/// non-blank line of the first non-empty chunk becomes the header; a later
/// chunk whose first line matches it (ignoring surrounding whitespace) has
/// that line dropped, otherwise the line is kept as data. Blank lines are
/// skipped everywhere.
///
/// Returns `None` when no chunk carries any content.
pub fn reassemble(chunks: &[LogChunk]) -> Option<ReassembledCsv> {
    let mut ordered: Vec<&LogChunk> = chunks.iter().collect();
    ordered.sort_by(|a, b| {
        a.created_at
            .total_cmp(&b.created_at)
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut header: Option<String> = None;
    let mut rows = Vec::new();

    for chunk in ordered {
        let mut lines = chunk
            .csv
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty());

        let Some(first) = lines.next() else {
            continue;
        };

        match &header {
            None => header = Some(first.to_string()),
            Some(canonical) if canonical.trim() == first.trim() => {}
            Some(_) => rows.push(first.to_string()),
        }
        rows.extend(lines.map(str::to_string));
    }

    let header = header?;
    tracing::debug!(
        chunks = chunks.len(),
        rows = rows.len(),
        "reassembled session log"
    );
    Some(ReassembledCsv { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(key: &str, csv: &str, created_at: f64) -> LogChunk {
        LogChunk::new(key, csv, created_at)
    }

    #[test]
    fn test_chunks_sorted_by_creation_time() {
        let chunks = vec![chunk("b", "h\n1,2\n", 2.0), chunk("a", "h\n3,4\n", 1.0)];
        let csv = reassemble(&chunks).unwrap();
        assert_eq!(csv.to_csv_string(), "h\n3,4\n1,2\n");
    }

    #[test]
    fn test_mismatched_header_is_data() {
        let chunks = vec![
            chunk("a", "x,y\n1,2", 1.0),
            chunk("b", "3,4\n5,6\n", 2.0),
        ];
        let csv = reassemble(&chunks).unwrap();
        assert_eq!(csv.header(), "x,y");
        assert_eq!(csv.rows(), ["1,2", "3,4", "5,6"]);
    }

    #[test]
    fn test_header_match_ignores_padding_and_crlf() {
        let chunks = vec![
            chunk("a", "x,y\r\n1,2\r\n", 1.0),
            chunk("b", "  x,y  \r\n3,4\r\n", 2.0),
        ];
        let csv = reassemble(&chunks).unwrap();
        assert_eq!(csv.to_csv_string(), "x,y\n1,2\n3,4\n");
    }

    #[test]
    fn test_blank_and_empty_chunks_skipped() {
        let chunks = vec![
            chunk("a", "", 0.0),
            chunk("b", "\n  \n", 1.0),
            chunk("c", "\nx,y\n\n1,2\n", 2.0),
        ];
        let csv = reassemble(&chunks).unwrap();
        assert_eq!(csv.header(), "x,y");
        assert_eq!(csv.row_count(), 1);
    }

    #[test]
    fn test_no_content_is_none() {
        assert!(reassemble(&[]).is_none());
        assert!(reassemble(&[chunk("a", "\n\n", 1.0)]).is_none());
    }

    #[test]
    fn test_equal_timestamps_order_by_key() {
        let chunks = vec![chunk("-Nb", "h\n2\n", 5.0), chunk("-Na", "h\n1\n", 5.0)];
        let csv = reassemble(&chunks).unwrap();
        assert_eq!(csv.rows(), ["1", "2"]);
    }
}
