// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webmention verification pipeline.
//!
//! `guard -> fetch -> parse -> match`, stopping at the first failing stage.
//! Every request produces exactly one [`VerificationOutcome`]; failures are
//! reported as `Rejected`, never returned as errors.

use crate::config::VerificationConfig;
use crate::error::{ErrorKind, Result, VerifyError};
use crate::fetcher::{HttpFetcher, SourceFetcher};
use crate::guard::UrlGuard;
use crate::matcher::{find_matches, MatchSet};
use crate::mf2::Mf2Document;
use crate::parser::{extract, HtmlMf2Parser, Mf2Parser};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, Instrument};

/// Per-call verification options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Maximum redirects followed when fetching the source (default: 5)
    pub max_redirects: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self { max_redirects: 5 }
    }
}

impl From<&VerificationConfig> for VerifyOptions {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            max_redirects: config.max_redirects,
        }
    }
}

/// Final result of verifying one mention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The source references the target. `matches` is never empty.
    Accepted {
        matches: MatchSet,
        document: Mf2Document,
    },
    Rejected { reason: ErrorKind, detail: String },
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn matches(&self) -> Option<&MatchSet> {
        match self {
            Self::Accepted { matches, .. } => Some(matches),
            Self::Rejected { .. } => None,
        }
    }

    pub fn document(&self) -> Option<&Mf2Document> {
        match self {
            Self::Accepted { document, .. } => Some(document),
            Self::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<ErrorKind> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { reason, .. } => Some(*reason),
        }
    }
}

impl From<VerifyError> for VerificationOutcome {
    fn from(err: VerifyError) -> Self {
        Self::Rejected {
            reason: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// Stateless verifier; clones share the same fetcher and parser.
#[derive(Clone)]
pub struct Verifier {
    guard: UrlGuard,
    fetcher: Arc<dyn SourceFetcher>,
    parser: Arc<dyn Mf2Parser>,
}

impl Verifier {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, parser: Arc<dyn Mf2Parser>) -> Self {
        Self {
            guard: UrlGuard::new(),
            fetcher,
            parser,
        }
    }

    /// Verifier using [`HttpFetcher`] and [`HtmlMf2Parser`].
    pub fn from_config(config: &VerificationConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HttpFetcher::new(config)?),
            Arc::new(HtmlMf2Parser::new()),
        ))
    }

    /// Verify that `source` references `target`.
    pub async fn verify(
        &self,
        source: &str,
        target: &str,
        options: &VerifyOptions,
    ) -> VerificationOutcome {
        let span = tracing::info_span!("verify", source = %source, target = %target);
        let outcome = match self.run(source, target, options).instrument(span.clone()).await {
            Ok((matches, document)) => VerificationOutcome::Accepted { matches, document },
            Err(err) => err.into(),
        };

        span.in_scope(|| match &outcome {
            VerificationOutcome::Accepted { matches, .. } => {
                info!(matches = ?matches.as_slice(), "Webmention verified")
            }
            VerificationOutcome::Rejected { reason, detail } => {
                info!(
                    reason = %reason,
                    policy = reason.is_policy(),
                    detail = %detail,
                    "Webmention rejected"
                )
            }
        });
        outcome
    }

    async fn run(
        &self,
        source: &str,
        target: &str,
        options: &VerifyOptions,
    ) -> Result<(MatchSet, Mf2Document)> {
        let pair = self.guard.check(source, target)?;
        debug!("Guarded");

        let fetched = self.fetcher.fetch(&pair.source, options.max_redirects).await?;
        debug!(status = fetched.status, bytes = fetched.body.len(), "Fetched");

        let document = extract(self.parser.as_ref(), &fetched.body, &fetched.url)?;
        debug!(items = document.item_count(), "Parsed");

        let matches = find_matches(&document, target);
        if matches.is_empty() {
            return Err(VerifyError::NoMention);
        }
        debug!(matches = matches.len(), "Matched");

        Ok((matches, document))
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier").field("guard", &self.guard).finish_non_exhaustive()
    }
}
