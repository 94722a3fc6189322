//! Loading the IDL document over HTTP or from disk.
//!
//! One request, no retries. A non-2xx status is an error.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Source;

/// Thin reqwest wrapper for the single upstream GET.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher. `None` leaves the request without a timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let ua = concat!("policytypes-gen/", env!("CARGO_PKG_VERSION"));

        let mut builder = reqwest::Client::builder().user_agent(ua);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        tracing::info!("Fetching {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), final_url = %resp.url(), "response received");

        let resp = resp
            .error_for_status()
            .with_context(|| format!("GET {url} returned {status}"))?;

        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read body from {url}"))?;

        tracing::debug!(bytes = body.len(), "body read");
        Ok(body)
    }
}

/// Read the IDL text from wherever `source` points.
pub async fn load_document(source: &Source) -> Result<String> {
    match source {
        Source::Remote { url, timeout } => HttpFetcher::new(*timeout)?.fetch(url).await,
        Source::File(path) => {
            tracing::info!("Reading {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
    }
}
