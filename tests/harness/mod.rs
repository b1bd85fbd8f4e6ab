// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the Webmention verifier.
//!
//! Provides canned source documents, URL generators, and fetchers that
//! stand in for the network.

#![allow(dead_code)]

pub mod fetchers;
pub mod fixtures;
pub mod generators;
