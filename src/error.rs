// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for Webmention verification.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Classification of a rejected verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUri,
    SelfReference,
    LoopbackAddress,
    FetchFailed,
    SourceNotFound,
    ParseFailed,
    NoMention,
}

impl ErrorKind {
    /// Stable label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUri => "invalid_uri",
            Self::SelfReference => "self_reference",
            Self::LoopbackAddress => "loopback_address",
            Self::FetchFailed => "fetch_failed",
            Self::SourceNotFound => "source_not_found",
            Self::ParseFailed => "parse_failed",
            Self::NoMention => "no_mention",
        }
    }

    /// Policy rejections are decided before any network access.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::InvalidUri | Self::SelfReference | Self::LoopbackAddress
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("`{param}` must be a valid absolute URI, got {url:?}")]
    InvalidUri { param: &'static str, url: String },

    #[error("`source` and `target` cannot be equal")]
    SelfReference,

    #[error("`source` cannot be loopback or local address: {host}")]
    LoopbackAddress { host: String },

    #[error("Failed to fetch `source`: {0}")]
    FetchFailed(String),

    #[error("`source` is not found (status {status})")]
    SourceNotFound { status: u16 },

    #[error("Failed to parse `source`: {0}")]
    ParseFailed(String),

    #[error("`source` does not mention `target`")]
    NoMention,
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUri { .. } => ErrorKind::InvalidUri,
            Self::SelfReference => ErrorKind::SelfReference,
            Self::LoopbackAddress { .. } => ErrorKind::LoopbackAddress,
            Self::FetchFailed(_) => ErrorKind::FetchFailed,
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::ParseFailed(_) => ErrorKind::ParseFailed,
            Self::NoMention => ErrorKind::NoMention,
        }
    }

    /// Status code observed when the source responded with something other than 200.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SourceNotFound { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        // Include the source chain, reqwest's top-level message is terse
        let mut detail = err.to_string();
        let mut cause = StdError::source(&err);
        while let Some(inner) = cause {
            detail.push_str(": ");
            detail.push_str(&inner.to_string());
            cause = inner.source();
        }
        VerifyError::FetchFailed(detail)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, VerifyError>;
