// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TraceError;
use crate::record::TraceRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Cell entry recorded for a period in which at least one round failed.
pub const ERROR_MARKER: &str = "ERROR";

/// Period index -> distinct mappings (and possibly [`ERROR_MARKER`]).
pub type PeriodMappings = BTreeMap<i64, BTreeSet<String>>;

/// Agent name -> its periods.
pub type TraceBuckets = BTreeMap<String, PeriodMappings>;

/// Index of the period containing `epoch`.
///
/// The API returns every round that overlaps the window, so a round can start
/// slightly before the computed window start. Those land in period `-1` and
/// are folded into period `0`.
pub fn period_index(epoch: i64, window_start_epoch: i64, period_secs: i64) -> i64 {
    match (epoch - window_start_epoch).div_euclid(period_secs) {
        -1 => 0,
        index => index,
    }
}

/// Groups trace rounds by agent and time period.
///
/// Each bucket is a set: an agent resolving to the same mapping many times in
/// one period contributes a single entry. Failed rounds add
/// [`ERROR_MARKER`] next to whatever mappings the period already holds.
pub fn bucket_traces(
    records: &[TraceRecord],
    window_start_epoch: i64,
    period_secs: i64,
) -> Result<TraceBuckets, TraceError> {
    if period_secs <= 0 {
        return Err(TraceError::InvalidWindow(format!(
            "period length must be positive, got {period_secs}s"
        )));
    }

    let mut buckets = TraceBuckets::new();
    for record in records {
        let period = period_index(record.epoch()?, window_start_epoch, period_secs);
        let cell = buckets
            .entry(record.agent_name.clone())
            .or_default()
            .entry(period)
            .or_default();
        if record.is_error() {
            cell.insert(ERROR_MARKER.to_string());
        } else {
            cell.insert(record.mappings.clone());
        }
    }
    Ok(buckets)
}
