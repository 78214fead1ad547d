// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! CSV rendering of bucketed traces. The report starts directly with the
//! header row (an empty cell, then one label per period); no title row
//! precedes it.

use crate::bucket::{PeriodMappings, TraceBuckets};
use crate::error::TraceError;
use chrono::DateTime;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Locale date and time (`MM/DD/YY HH:MM:SS`), rendered in UTC.
pub const PERIOD_LABEL_FORMAT: &str = "%x %X";

/// Renders the buckets as CSV text.
///
/// The header row has an empty first cell followed by the start time of each
/// period of the first agent. Every agent row lists only the periods that
/// agent has data for, so columns are not aligned across agents.
pub fn render_csv(
    buckets: &TraceBuckets,
    window_start_epoch: i64,
    period_secs: i64,
) -> Result<String, TraceError> {
    let mut writer = csv_writer(Vec::new());
    write_rows(&mut writer, buckets, window_start_epoch, period_secs)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| TraceError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the CSV report to `path`, replacing any existing file.
pub fn write_csv_file(
    path: &Path,
    buckets: &TraceBuckets,
    window_start_epoch: i64,
    period_secs: i64,
) -> Result<(), TraceError> {
    let file = File::create(path)?;
    let mut writer = csv_writer(file);
    write_rows(&mut writer, buckets, window_start_epoch, period_secs)?;
    debug!("Wrote {} agent rows to {}", buckets.len(), path.display());
    Ok(())
}

fn csv_writer<W: io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn write_rows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    buckets: &TraceBuckets,
    window_start_epoch: i64,
    period_secs: i64,
) -> Result<(), TraceError> {
    let Some(first_periods) = buckets.values().next() else {
        return Ok(());
    };

    let mut header = vec![String::new()];
    for period in first_periods.keys() {
        header.push(period_label(window_start_epoch, *period, period_secs)?);
    }
    writer.write_record(&header)?;

    for (agent, periods) in buckets {
        writer.write_record(agent_row(agent, periods))?;
    }
    writer.flush()?;
    Ok(())
}

fn agent_row(agent: &str, periods: &PeriodMappings) -> Vec<String> {
    let mut row = Vec::with_capacity(periods.len() + 1);
    row.push(agent.to_string());
    row.extend(periods.values().map(|cell| {
        cell.iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }));
    row
}

fn period_label(
    window_start_epoch: i64,
    period: i64,
    period_secs: i64,
) -> Result<String, TraceError> {
    let start = window_start_epoch + period * period_secs;
    DateTime::from_timestamp(start, 0)
        .map(|dt| dt.format(PERIOD_LABEL_FORMAT).to_string())
        .ok_or_else(|| TraceError::InvalidWindow(format!("period start {start} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn cell(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_render_error_example() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "A".to_string(),
            PeriodMappings::from([(0, cell(&["1.2.3.4"])), (1, cell(&["ERROR"]))]),
        );

        let csv = render_csv(&buckets, 1000, 3600).unwrap();
        assert_eq!(
            csv,
            ",01/01/70 00:16:40,01/01/70 01:16:40\n\
             A,1.2.3.4,ERROR\n"
        );
    }

    #[test]
    fn test_cell_joins_without_trailing_separator() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "A".to_string(),
            PeriodMappings::from([(0, cell(&["5.6.7.8", "ERROR", "1.1.1.1"]))]),
        );

        let csv = render_csv(&buckets, 0, 3600).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "A,1.1.1.1;5.6.7.8;ERROR");
    }

    #[test]
    fn test_single_mapping_not_doubled() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "A".to_string(),
            PeriodMappings::from([(0, cell(&["5.6.7.8", "5.6.7.8"]))]),
        );

        let csv = render_csv(&buckets, 0, 3600).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "A,5.6.7.8");
    }

    #[test]
    fn test_rows_are_ragged_and_header_follows_first_agent() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "Ashburn".to_string(),
            PeriodMappings::from([(1, cell(&["192.0.2.1"]))]),
        );
        buckets.insert(
            "Tokyo".to_string(),
            PeriodMappings::from([
                (0, cell(&["192.0.2.2"])),
                (1, cell(&["192.0.2.2"])),
                (3, cell(&["192.0.2.3"])),
            ]),
        );

        let csv = render_csv(&buckets, 0, 3600).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                ",01/01/70 01:00:00",
                "Ashburn,192.0.2.1",
                "Tokyo,192.0.2.2,192.0.2.2,192.0.2.3",
            ]
        );
    }

    #[test]
    fn test_agent_names_with_commas_are_quoted() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "Ashburn, VA".to_string(),
            PeriodMappings::from([(0, cell(&["192.0.2.1"]))]),
        );

        let csv = render_csv(&buckets, 0, 3600).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "\"Ashburn, VA\",192.0.2.1");
    }

    #[test]
    fn test_empty_buckets_render_nothing() {
        assert_eq!(render_csv(&TraceBuckets::new(), 0, 3600).unwrap(), "");
    }

    #[test]
    fn test_write_csv_file_matches_render() {
        let mut buckets = TraceBuckets::new();
        buckets.insert(
            "A".to_string(),
            PeriodMappings::from([(0, cell(&["1.2.3.4"])), (2, cell(&["ERROR"]))]),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output1000.csv");
        write_csv_file(&path, &buckets, 1000, 3600).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_csv(&buckets, 1000, 3600).unwrap());
    }

    #[test]
    fn test_write_csv_file_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output.csv");
        let result = write_csv_file(&path, &TraceBuckets::new(), 0, 3600);
        assert!(matches!(result, Err(TraceError::Io(_))));
    }
}
