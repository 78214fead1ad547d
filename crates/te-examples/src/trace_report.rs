// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExampleError;
use std::path::{Path, PathBuf};
use te_api::ApiClient;
use te_dns_trace::{bucket_traces, write_csv_file, TracePager, TraceWindow};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    pub path: PathBuf,
    pub pages: usize,
    pub records: usize,
    pub agents: usize,
}

/// Fetches every trace page of `test_id` inside `window`, buckets the
/// mappings and writes `output<end>.csv` into `out_dir`.
///
/// `on_page` runs after each fetched page with the number of pages so far.
pub async fn export_dns_trace<F>(
    client: &ApiClient,
    test_id: &str,
    window: &TraceWindow,
    out_dir: &Path,
    mut on_page: F,
) -> Result<TraceReport, ExampleError>
where
    F: FnMut(usize),
{
    let mut pager = TracePager::new(client, test_id, window);
    let mut traces = Vec::new();
    while let Some(page) = pager.next_page().await? {
        traces.extend(page);
        on_page(pager.pages_fetched());
    }

    let buckets = bucket_traces(&traces, window.start_epoch(), window.period_secs())?;
    let path = out_dir.join(window.output_file_name());
    write_csv_file(&path, &buckets, window.start_epoch(), window.period_secs())?;

    info!(
        "Exported {} trace records from {} agents to {}",
        traces.len(),
        buckets.len(),
        path.display()
    );
    Ok(TraceReport {
        path,
        pages: pager.pages_fetched(),
        records: traces.len(),
        agents: buckets.len(),
    })
}
