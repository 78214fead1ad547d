// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::http_test::DEFAULT_TEST_URL;
use crate::stale_tests::{parse_date, IssueWindow};
use chrono::NaiveDateTime;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use te_dns_trace::window::{DEFAULT_PERIOD_HOURS, DEFAULT_WINDOW_DAYS};

/// Runs one of the ThousandEyes API examples.
///
/// 1: IP addresses of all Cloud agents.
/// 2: create an HTTP server test on every online Enterprise agent.
/// 3: availability of a DNS server test's last round.
/// 4: export a DNS trace test's mappings per agent and period to CSV.
/// 5: find tests that stopped reporting during an incident.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(name = "te-examples", version)]
pub struct Cli {
    /// Account email
    pub email: String,
    /// API token of the account
    pub api_token: String,
    /// Example to run
    #[clap(default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub example: u8,
    /// Test ID, required by examples 3 and 4
    pub test_id: Option<String>,
    /// Days of trace history to export
    #[clap(default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    pub window_days: u32,
    /// Length of each CSV period in hours
    #[clap(default_value_t = DEFAULT_PERIOD_HOURS, value_parser = clap::value_parser!(u32).range(1..))]
    pub period_hours: u32,
    /// Account group ID to run against instead of the user's default
    #[clap(long)]
    pub account_group: Option<String>,
    /// URL probed by the test created in example 2
    #[clap(long, default_value = DEFAULT_TEST_URL)]
    pub url: String,
    /// Re-enable the stale tests found by example 5
    #[clap(long)]
    pub reenable: bool,
    /// Incident start, UTC `YYYY-MM-DD HH:MM:SS`
    #[clap(long, value_parser = parse_issue_time)]
    pub issue_start: Option<NaiveDateTime>,
    /// Incident end, UTC `YYYY-MM-DD HH:MM:SS`
    #[clap(long, value_parser = parse_issue_time)]
    pub issue_end: Option<NaiveDateTime>,
}

impl Cli {
    /// Argument combinations clap cannot express on its own.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if matches!(self.example, 3 | 4) && self.test_id.is_none() {
            return Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                format!("example {} requires a <TEST_ID>", self.example),
            ));
        }
        self.issue_window()
            .map(|_| ())
            .map_err(|e| Cli::command().error(ErrorKind::ValueValidation, e))
    }

    pub fn issue_window(&self) -> Result<IssueWindow, crate::ExampleError> {
        let defaults = IssueWindow::default();
        IssueWindow::new(
            self.issue_start.unwrap_or(defaults.start),
            self.issue_end.unwrap_or(defaults.end),
        )
    }
}

fn parse_issue_time(value: &str) -> Result<NaiveDateTime, String> {
    parse_date(value).map_err(|e| e.to_string())
}
