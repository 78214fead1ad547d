// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TraceError;
use crate::record::{DnsTest, TracePage, TraceRecord};
use crate::window::TraceWindow;
use te_api::ApiClient;
use tracing::debug;

const DNS_TRACE_TEST_TYPE: &str = "dns-trace";
const A_RECORD_SUFFIX: &str = " A";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    First,
    Next(String),
    Exhausted,
}

/// Walks the pages of a DNS trace test's results, one request per call.
///
/// The first page is requested through the test endpoint with the window
/// parameter and must describe an A-record DNS trace test. Later pages follow
/// the absolute `pages.next` link of the previous response. The walk ends when
/// a page carries no link; there is no built-in page limit.
#[derive(Debug)]
pub struct TracePager<'a> {
    client: &'a ApiClient,
    test_id: String,
    window_param: String,
    cursor: Cursor,
    pages_fetched: usize,
    test: Option<DnsTest>,
}

impl<'a> TracePager<'a> {
    pub fn new(client: &'a ApiClient, test_id: impl Into<String>, window: &TraceWindow) -> Self {
        Self {
            client,
            test_id: test_id.into(),
            window_param: window.window_param(),
            cursor: Cursor::First,
            pages_fetched: 0,
            test: None,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("/dns/trace/{}.json", self.test_id)
    }

    /// Test metadata from the first page, once it has been fetched.
    pub fn test(&self) -> Option<&DnsTest> {
        self.test.as_ref()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == Cursor::Exhausted
    }

    /// Starts over from the first page. Pages are never resumed mid-walk.
    pub fn restart(&mut self) {
        self.cursor = Cursor::First;
        self.pages_fetched = 0;
        self.test = None;
    }

    /// Fetches the next page and returns its records, or `None` once the last
    /// page has been consumed.
    pub async fn next_page(&mut self) -> Result<Option<Vec<TraceRecord>>, TraceError> {
        let is_first = self.cursor == Cursor::First;
        let response = match &self.cursor {
            Cursor::Exhausted => return Ok(None),
            Cursor::First => {
                self.client
                    .get(&self.endpoint(), &[("window", self.window_param.as_str())])
                    .await?
            }
            Cursor::Next(url) => self.client.get_by_url(url).await?,
        };

        let Some(response) = response else {
            self.cursor = Cursor::Exhausted;
            return Err(TraceError::RateLimited);
        };
        let page: TracePage =
            serde_json::from_value(response).map_err(TraceError::UnexpectedShape)?;

        if is_first {
            let test = page.dns.test.ok_or(TraceError::MissingTestMetadata)?;
            validate_test(&test)?;
            self.test = Some(test);
        }

        self.pages_fetched += 1;
        self.cursor = match page.pages.next {
            Some(next) => Cursor::Next(next),
            None => Cursor::Exhausted,
        };
        debug!(
            "Fetched trace page {} of test {} with {} records",
            self.pages_fetched,
            self.test_id,
            page.dns.trace.len()
        );
        Ok(Some(page.dns.trace))
    }

    /// Drains the remaining pages, concatenating their records in order.
    pub async fn collect_all(&mut self) -> Result<Vec<TraceRecord>, TraceError> {
        let mut traces = Vec::new();
        while let Some(page) = self.next_page().await? {
            traces.extend(page);
        }
        Ok(traces)
    }
}

/// Requires a DNS trace test whose domain is configured for A records
/// (`dns.test.domain` ends with ` A`).
pub fn validate_test(test: &DnsTest) -> Result<(), TraceError> {
    if test.test_type != DNS_TRACE_TEST_TYPE {
        return Err(TraceError::NotDnsTrace(test.test_type.clone()));
    }
    if !test.domain.ends_with(A_RECORD_SUFFIX) {
        return Err(TraceError::NotARecordTest(test.domain.clone()));
    }
    Ok(())
}

/// Every trace round of `test_id` inside `window`, across all pages.
///
/// A failure on any page discards the records gathered so far.
pub async fn load_traces(
    client: &ApiClient,
    test_id: &str,
    window: &TraceWindow,
) -> Result<Vec<TraceRecord>, TraceError> {
    TracePager::new(client, test_id, window).collect_all().await
}

/// Like [`load_traces`] but stops after `max_pages` pages.
pub async fn load_traces_limited(
    client: &ApiClient,
    test_id: &str,
    window: &TraceWindow,
    max_pages: usize,
) -> Result<Vec<TraceRecord>, TraceError> {
    let mut pager = TracePager::new(client, test_id, window);
    let mut traces = Vec::new();
    while pager.pages_fetched() < max_pages {
        match pager.next_page().await? {
            Some(page) => traces.extend(page),
            None => break,
        }
    }
    Ok(traces)
}
