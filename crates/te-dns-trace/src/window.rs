// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TraceError;
use chrono::Utc;

pub const DEFAULT_WINDOW_DAYS: u32 = 2;
pub const DEFAULT_PERIOD_HOURS: u32 = 1;

const SECS_PER_DAY: i64 = 24 * 60 * 60;
const SECS_PER_HOUR: i64 = 60 * 60;

/// Time range covered by a report and the length of its aggregation periods.
///
/// The window ends at `end_epoch` and reaches `window_days` back; it is split
/// into periods of `period_hours` counted from the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceWindow {
    end_epoch: i64,
    window_days: u32,
    period_hours: u32,
}

impl TraceWindow {
    pub fn new(end_epoch: i64, window_days: u32, period_hours: u32) -> Result<Self, TraceError> {
        if window_days == 0 {
            return Err(TraceError::InvalidWindow(
                "time window must be at least one day".to_string(),
            ));
        }
        if period_hours == 0 {
            return Err(TraceError::InvalidWindow(
                "time period must be at least one hour".to_string(),
            ));
        }
        Ok(Self {
            end_epoch,
            window_days,
            period_hours,
        })
    }

    /// Window of `window_days` ending at the current time.
    pub fn ending_now(window_days: u32, period_hours: u32) -> Result<Self, TraceError> {
        Self::new(Utc::now().timestamp(), window_days, period_hours)
    }

    pub fn end_epoch(&self) -> i64 {
        self.end_epoch
    }

    pub fn start_epoch(&self) -> i64 {
        self.end_epoch - i64::from(self.window_days) * SECS_PER_DAY
    }

    pub fn period_secs(&self) -> i64 {
        i64::from(self.period_hours) * SECS_PER_HOUR
    }

    /// Value of the API `window` query parameter, e.g. `2d`.
    pub fn window_param(&self) -> String {
        format!("{}d", self.window_days)
    }

    /// `output<end epoch>.csv`, unique per run.
    pub fn output_file_name(&self) -> String {
        format!("output{}.csv", self.end_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let window = TraceWindow::new(1_460_682_000, 2, 1).unwrap();
        assert_eq!(window.start_epoch(), 1_460_682_000 - 172_800);
        assert_eq!(window.period_secs(), 3600);
        assert_eq!(window.window_param(), "2d");
        assert_eq!(window.output_file_name(), "output1460682000.csv");
    }

    #[test]
    fn test_multi_hour_periods() {
        let window = TraceWindow::new(0, 7, 6).unwrap();
        assert_eq!(window.period_secs(), 21_600);
        assert_eq!(window.window_param(), "7d");
    }

    #[test]
    fn test_zero_lengths_rejected() {
        assert!(matches!(
            TraceWindow::new(0, 0, 1),
            Err(TraceError::InvalidWindow(_))
        ));
        assert!(matches!(
            TraceWindow::new(0, 2, 0),
            Err(TraceError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_ending_now_uses_current_time() {
        let before = Utc::now().timestamp();
        let window = TraceWindow::ending_now(DEFAULT_WINDOW_DAYS, DEFAULT_PERIOD_HOURS).unwrap();
        assert!(window.end_epoch() >= before);
        assert_eq!(window.end_epoch() - window.start_epoch(), 2 * SECS_PER_DAY);
    }
}
