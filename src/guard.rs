// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pre-fetch URL guard.
//!
//! Rules are evaluated in order and the first failure wins:
//! 1. `source` and `target` must be absolute URIs with a host
//! 2. `source` and `target` must differ
//! 3. `source` must not point at `localhost` or a `127.`, `192.` or `10.` host
//!
//! Rule 3 is a textual prefix check. It does not resolve DNS and leaves
//! 172.16/12, IPv6 loopback and rebinding attacks uncovered.

use crate::error::{Result, VerifyError};
use tracing::debug;
use url::Url;

const LOOPBACK_PREFIXES: &[&str] = &["localhost", "127.", "192.", "10."];

/// A `source`/`target` pair that passed every guard rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedPair {
    pub source: Url,
    pub target: Url,
}

/// Stateless validator for the `source`/`target` pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlGuard;

impl UrlGuard {
    pub fn new() -> Self {
        Self
    }

    /// Check a pair before any network access happens.
    pub fn check(&self, source: &str, target: &str) -> Result<GuardedPair> {
        let source_url = parse_absolute("source", source)?;
        let target_url = parse_absolute("target", target)?;

        if source == target {
            debug!(source = %source, "Self-referencing mention");
            return Err(VerifyError::SelfReference);
        }

        if let Some(host) = loopback_host(source, &source_url) {
            debug!(source = %source, host = %host, "Loopback source rejected");
            return Err(VerifyError::LoopbackAddress { host });
        }

        Ok(GuardedPair {
            source: source_url,
            target: target_url,
        })
    }
}

/// Parse `raw` as an absolute URI with a scheme and a non-empty host.
fn parse_absolute(param: &'static str, raw: &str) -> Result<Url> {
    let invalid = || VerifyError::InvalidUri {
        param,
        url: raw.to_string(),
    };

    // Url::parse silently trims, the raw string must already be clean
    if raw.is_empty() || raw.trim() != raw || raw.contains(char::is_whitespace) {
        return Err(invalid());
    }

    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if url.has_authority() && !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// Return the offending host if `source` looks local.
fn loopback_host(raw: &str, url: &Url) -> Option<String> {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    if has_loopback_prefix(&host) {
        return Some(host);
    }

    let lowered = raw.to_lowercase();
    let stripped = lowered
        .strip_prefix("http://")
        .or_else(|| lowered.strip_prefix("https://"))
        .unwrap_or(&lowered);
    if has_loopback_prefix(stripped) {
        return Some(host);
    }

    None
}

fn has_loopback_prefix(s: &str) -> bool {
    LOOPBACK_PREFIXES.iter().any(|prefix| s.starts_with(prefix))
}
