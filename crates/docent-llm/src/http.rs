//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create the HTTP client used by the remote embedding adapters.
///
/// Config: 30s connect timeout, 60s request timeout, rustls TLS,
/// `docent/{version}` user-agent, redirect limit 10. Falls back to a bare
/// client if the builder rejects the configuration.
#[must_use]
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(60))
        .user_agent(concat!("docent/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("HTTP client builder failed, using defaults: {e}");
            reqwest::Client::new()
        })
}
