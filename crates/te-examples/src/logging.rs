// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "TE_LOG_LEVEL";

/// Filter directives for `level`, with HTTP stack internals muted.
pub fn filter_directives(level: &str) -> String {
    format!("h2=off,hyper=off,rustls=off,{}", level.to_lowercase())
}

/// Installs the global subscriber. Logs go to stderr so example output on
/// stdout stays clean.
pub fn init() -> anyhow::Result<()> {
    let level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(filter_directives(&level))
        .map_err(|e| anyhow::anyhow!("could not parse {LOG_LEVEL_ENV}='{level}': {e}"))?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {e}"))?;
    Ok(())
}
