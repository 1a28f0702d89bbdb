use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use futures_util::{stream, StreamExt};
use log::{debug, warn};
use reqwest::Client;

use crate::config::{DispatchMode, TargetConfig};
use crate::request::build_request;

use super::models::{DispatchReport, DispatchSummary, Outcome, ResponseRecord};

/// POSTs every file and hands each report to `sink` as soon as it is ready.
///
/// Sequential mode preserves the order of `files`. Concurrent mode keeps at
/// most `config.concurrency` requests in flight and reports in completion
/// order. Failures only affect the file they belong to.
pub async fn dispatch<F>(
    client: &Client,
    files: &[PathBuf],
    config: &TargetConfig,
    mut sink: F,
) -> DispatchSummary
where
    F: FnMut(&DispatchReport),
{
    let mut summary = DispatchSummary::default();

    match config.mode {
        DispatchMode::Sequential => {
            for file in files {
                let report = post_file(client, file, config).await;
                summary.record(&report);
                sink(&report);
            }
        }
        DispatchMode::Concurrent => {
            let limit = config.concurrency.max(1);
            debug!("dispatching {} file(s), {} at a time", files.len(), limit);

            let mut in_flight = stream::iter(files)
                .map(|file| post_file(client, file, config))
                .buffer_unordered(limit);

            while let Some(report) = in_flight.next().await {
                summary.record(&report);
                sink(&report);
            }
        }
    }

    summary
}

async fn post_file(client: &Client, file: &Path, config: &TargetConfig) -> DispatchReport {
    let outcome = match send(client, file, config).await {
        Ok(record) => Outcome::Delivered(record),
        Err(err) => {
            warn!("POST {} failed: {:#}", file.display(), err);
            Outcome::Skipped(format!("{err:#}"))
        }
    };

    DispatchReport {
        file: file.to_path_buf(),
        outcome,
    }
}

async fn send(client: &Client, file: &Path, config: &TargetConfig) -> Result<ResponseRecord> {
    let request = build_request(client, file, config).await?;
    debug!("POST {} -> {}", file.display(), request.url());

    let start = Instant::now();
    let response = client
        .execute(request)
        .await
        .with_context(|| format!("sending {}", file.display()))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .with_context(|| format!("reading response body for {}", file.display()))?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(ResponseRecord {
        status: status.as_u16(),
        status_text: status_line(status),
        body: body.to_vec(),
        duration_ms,
    })
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
