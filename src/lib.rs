// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webmention Verifier
//!
//! This crate implements the receiving side of Webmention: before a mention
//! is trusted, the claimed `source` is fetched and checked for a reference
//! to `target`.
//!
//! - URL guard (valid URIs, no self-reference, no local sources)
//! - Bounded source fetch (redirect limit, timeout, body cap)
//! - Microformats2 extraction
//! - Target matching by property name
//! - Axum receiving endpoint with Prometheus metrics

pub mod config;
pub mod error;
pub mod fetcher;
pub mod guard;
pub mod handlers;
pub mod matcher;
pub mod metrics;
pub mod mf2;
pub mod parser;
pub mod verifier;

pub use config::Config;
pub use error::{ErrorKind, VerifyError};
pub use matcher::{find_matches, MatchSet};
pub use mf2::{Item, Mf2Document, PropertyValue};
pub use verifier::{VerificationOutcome, Verifier, VerifyOptions};
