//! History records

use std::io::Write;

use super::{LiveRecord, StatusKind};
use crate::display::{format_epoch_ms, DASH};

/// Header of an exported history table
pub const HISTORY_CSV_HEADER: [&str; 8] = [
    "time", "status", "voltage", "current", "temp", "zcv", "thd", "entropy",
];

/// Newest records first, at most `limit` of them
pub fn latest_first(mut records: Vec<LiveRecord>, limit: usize) -> Vec<LiveRecord> {
    records.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
    records.truncate(limit);
    records
}

/// Records whose status falls into `kind`
pub fn filter_by_kind(records: &[LiveRecord], kind: StatusKind) -> Vec<&LiveRecord> {
    records
        .iter()
        .filter(|r| StatusKind::classify_history(r.status.as_deref().unwrap_or("")) == kind)
        .collect()
}

/// Time column text: ISO stamp if present, else the formatted epoch
pub fn time_text(record: &LiveRecord) -> String {
    match record.iso() {
        Some(iso) => iso.to_string(),
        None => format_epoch_ms(record.sort_key() as i64),
    }
}

/// Write records as a CSV table in the given order
pub fn write_history_csv<W: Write>(writer: W, records: &[LiveRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HISTORY_CSV_HEADER)?;
    for record in records {
        let status = record
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DASH);
        let time = time_text(record);
        let values = record.formatted_values();
        let mut row = Vec::with_capacity(HISTORY_CSV_HEADER.len());
        row.push(time.as_str());
        row.push(status);
        row.extend(values.iter().map(String::as_str));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(status: &str, server_ts: f64) -> LiveRecord {
        LiveRecord {
            status: Some(status.to_string()),
            server_ts,
            ..Default::default()
        }
    }

    #[test]
    fn test_latest_first_orders_and_limits() {
        let records = vec![record("a", 1.0), record("c", 3.0), record("b", 2.0)];
        let ordered = latest_first(records, 2);
        let names: Vec<_> = ordered.iter().map(|r| r.status.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[test]
    fn test_device_time_fallback_ordering() {
        let device_only = LiveRecord {
            ts_epoch_ms: 5.0,
            ..Default::default()
        };
        let ordered = latest_first(vec![record("server", 4.0), device_only], 10);
        assert_eq!(ordered[0].ts_epoch_ms, 5.0);
    }

    #[test]
    fn test_filter_by_kind() {
        let records = vec![record("ARC", 1.0), record("ok", 2.0), record("OVERLOAD", 3.0)];
        assert_eq!(filter_by_kind(&records, StatusKind::Arcing).len(), 1);
        assert_eq!(filter_by_kind(&records, StatusKind::Warning).len(), 1);
        assert_eq!(filter_by_kind(&records, StatusKind::Ok).len(), 1);
    }

    #[test]
    fn test_write_history_csv() {
        let records = vec![LiveRecord {
            voltage: Some(230.04),
            current: Some(1.5),
            status: Some("ARCING".into()),
            ts_iso: Some("2026-01-01T00:00:00Z".into()),
            ..Default::default()
        }];
        let mut out = Vec::new();
        write_history_csv(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "time,status,voltage,current,temp,zcv,thd,entropy\n\
             2026-01-01T00:00:00Z,ARCING,230.0,1.50,—,—,—,—\n"
        );
    }

    #[test]
    fn test_time_text_without_clock_is_dash() {
        assert_eq!(time_text(&LiveRecord::default()), DASH);
    }
}
