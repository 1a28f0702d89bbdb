use std::path::Path;

use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client, Request};
use tokio::fs;

use crate::config::TargetConfig;

pub const MARKER_HEADER: &str = "X-Custom-Header";
pub const MARKER_VALUE: &str = "JBLASTOR";

pub fn build_client(config: &TargetConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("jblastor/", env!("CARGO_PKG_VERSION")));
    if !config.timeout.is_zero() {
        builder = builder.timeout(config.timeout);
    }
    builder.build().context("building HTTP client")
}

/// Reads `path` and wraps its bytes in a POST to the configured endpoint.
pub async fn build_request(client: &Client, path: &Path, config: &TargetConfig) -> Result<Request> {
    let body = fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let mut request_builder = client
        .post(config.endpoint.clone())
        .header(CONTENT_TYPE, "application/json")
        .header(MARKER_HEADER, MARKER_VALUE);

    for (name, value) in &config.extra_headers {
        request_builder = request_builder.header(name, value);
    }

    if let Some(credentials) = &config.credentials {
        request_builder =
            request_builder.basic_auth(&credentials.user, Some(&credentials.password));
    }

    request_builder
        .body(body)
        .build()
        .with_context(|| format!("building request for {}", path.display()))
}
