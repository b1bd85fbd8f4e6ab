// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fetchers that keep verification tests off the public network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;
use webmention_verifier::error::{Result, VerifyError};
use webmention_verifier::fetcher::{FetchResult, HttpFetcher, SourceFetcher};

/// Serves canned pages keyed by URL; anything else is a connection failure.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, (u16, String)>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), (200, body.into()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, String::new()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url, _max_redirects: usize) -> Result<FetchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url.as_str()) {
            Some((200, body)) => Ok(FetchResult {
                status: 200,
                body: body.clone(),
                url: url.clone(),
            }),
            Some((status, _)) => Err(VerifyError::SourceNotFound { status: *status }),
            None => Err(VerifyError::FetchFailed(format!(
                "connection refused: {url}"
            ))),
        }
    }
}

/// Sends every request to `upstream` (a local mock server), keeping the path.
///
/// Lets public-looking sources pass the loopback guard while the real
/// HTTP fetcher talks to a local server.
pub struct RewriteFetcher {
    pub inner: HttpFetcher,
    pub upstream: Url,
}

#[async_trait]
impl SourceFetcher for RewriteFetcher {
    async fn fetch(&self, url: &Url, max_redirects: usize) -> Result<FetchResult> {
        let mut rewritten = self.upstream.clone();
        rewritten.set_path(url.path());
        rewritten.set_query(url.query());
        self.inner.fetch(&rewritten, max_redirects).await
    }
}
