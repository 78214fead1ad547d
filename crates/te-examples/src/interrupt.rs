// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ExampleError;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancels `cancel` on the first Ctrl-C.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, aborting pending requests");
            cancel.cancel();
        }
    });
}

/// Drives `work` to completion unless `cancel` fires first, in which case
/// `work` is dropped mid-flight and [`ExampleError::Interrupted`] is returned.
pub async fn until_cancelled<T, E, F>(cancel: &CancellationToken, work: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<ExampleError>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ExampleError::Interrupted.into()),
        result = work => result,
    }
}
