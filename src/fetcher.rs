// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded retrieval of a mention source.
//!
//! One attempt per verification. Redirects are followed by hand so the hop
//! limit can vary per call; the reqwest client itself never follows them.
//! The configured timeout bounds the whole chain, not each hop.

use crate::config::VerificationConfig;
use crate::error::{Result, VerifyError};
use async_trait::async_trait;
use reqwest::{header, redirect, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A fetched source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    pub body: String,
    /// Final URL after redirects.
    pub url: Url,
}

/// Outbound fetch of a source document.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// GET `url`, following at most `max_redirects` redirects.
    ///
    /// Transport failures and redirect overflow are `FetchFailed`, any final
    /// status other than 200 is `SourceNotFound`.
    async fn fetch(&self, url: &Url, max_redirects: usize) -> Result<FetchResult>;
}

/// [`SourceFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher with the configured timeout and User-Agent.
    pub fn new(config: &VerificationConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    async fn fetch_chain(&self, url: &Url, max_redirects: usize) -> Result<FetchResult> {
        let mut current = url.clone();
        let mut hops = 0usize;

        loop {
            debug!(url = %current, hops, "Fetching source");
            let mut response = self
                .client
                .get(current.clone())
                .header(header::ACCEPT, "text/html, */*;q=0.8")
                .send()
                .await
                .map_err(|e| {
                    warn!(url = %current, error = %e, "Source fetch failed");
                    VerifyError::from(e)
                })?;

            let status = response.status();
            if status.is_redirection() {
                if let Some(next) = redirect_target(&current, response.headers()) {
                    hops += 1;
                    if hops > max_redirects {
                        warn!(url = %url, max_redirects, "Too many redirects");
                        return Err(VerifyError::FetchFailed(format!(
                            "too many redirects (limit {max_redirects})"
                        )));
                    }
                    current = next?;
                    continue;
                }
            }

            if status != StatusCode::OK {
                debug!(url = %current, status = status.as_u16(), "Source not found");
                return Err(VerifyError::SourceNotFound {
                    status: status.as_u16(),
                });
            }

            if response
                .content_length()
                .is_some_and(|len| len > self.max_body_bytes as u64)
            {
                return Err(body_too_large(self.max_body_bytes));
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > self.max_body_bytes {
                    return Err(body_too_large(self.max_body_bytes));
                }
                bytes.extend_from_slice(&chunk);
            }

            return Ok(FetchResult {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
                url: current,
            });
        }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, max_redirects: usize) -> Result<FetchResult> {
        let timeout_ms = self.timeout.as_millis();
        tokio::time::timeout(self.timeout, self.fetch_chain(url, max_redirects))
            .await
            .map_err(|_| {
                warn!(url = %url, timeout_ms = timeout_ms as u64, "Source fetch timed out");
                VerifyError::FetchFailed(format!("timed out after {timeout_ms} ms"))
            })?
    }
}

/// Resolve the `Location` of a redirect, `None` if the header is absent.
fn redirect_target(current: &Url, headers: &header::HeaderMap) -> Option<Result<Url>> {
    let location = headers.get(header::LOCATION)?;
    Some(
        location
            .to_str()
            .ok()
            .and_then(|loc| current.join(loc).ok())
            .ok_or_else(|| {
                VerifyError::FetchFailed(format!("invalid redirect location {location:?}"))
            }),
    )
}

fn body_too_large(limit: usize) -> VerifyError {
    VerifyError::FetchFailed(format!("source body exceeds {limit} bytes"))
}
