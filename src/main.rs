// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webmention Verifier Service
//!
//! Receives Webmentions and verifies that each `source` actually references
//! its `target` before reporting it as accepted.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `MAX_REDIRECTS`: Redirects followed per source fetch (default: 5)
//! - `FETCH_TIMEOUT_MS`: Source fetch timeout (default: 10000)
//! - `MAX_BODY_BYTES`: Largest accepted source body (default: 1048576)
//! - `USER_AGENT`: User-Agent for source fetches
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use webmention_verifier::{
    config::{Config, VerificationConfig},
    handlers::{router, AppState},
    metrics::Metrics,
    verifier::{Verifier, VerifyOptions},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_redirects = config.verification.max_redirects,
        timeout_ms = config.verification.timeout_ms,
        max_body_bytes = config.verification.max_body_bytes,
        "Starting Webmention verifier"
    );

    let verifier = Verifier::from_config(&config.verification)?;
    let state = Arc::new(AppState {
        verifier,
        options: VerifyOptions::from(&config.verification),
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = VerificationConfig::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        verification: VerificationConfig {
            max_redirects: env_or("MAX_REDIRECTS", defaults.max_redirects),
            timeout_ms: env_or("FETCH_TIMEOUT_MS", defaults.timeout_ms),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            user_agent: std::env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        },
        metrics: webmention_verifier::config::MetricsConfig {
            enabled: env_or("METRICS_ENABLED", true),
            ..Default::default()
        },
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
