// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for verification outcomes.

use crate::verifier::VerificationOutcome;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Verification counters, registered on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    verifications: IntCounterVec,
    duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let verifications = IntCounterVec::new(
            Opts::new(
                "webmention_verifications_total",
                "Webmention verifications by outcome",
            ),
            &["outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "webmention_verification_duration_seconds",
                "Wall time of a verification, fetch included",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["outcome"],
        )?;

        registry.register(Box::new(verifications.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            verifications,
            duration,
        })
    }

    /// Record one finished verification.
    pub fn observe(&self, outcome: &VerificationOutcome, elapsed: Duration) {
        let label = outcome_label(outcome);
        self.verifications.with_label_values(&[label]).inc();
        self.duration
            .with_label_values(&[label])
            .observe(elapsed.as_secs_f64());
    }

    /// Count recorded for an outcome label.
    pub fn count(&self, label: &str) -> u64 {
        self.verifications.with_label_values(&[label]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// `accepted`, or the rejection kind.
pub fn outcome_label(outcome: &VerificationOutcome) -> &'static str {
    match outcome.reason() {
        None => "accepted",
        Some(kind) => kind.as_str(),
    }
}
