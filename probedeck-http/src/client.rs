//! Shared HTTP client and base URL handling

use std::sync::LazyLock;
use std::time::Duration;

use probedeck_core::{ProbeError, ProbeResult};
use reqwest::Client;
use url::Url;

/// Client-level safety-net timeout. Per-request timeouts are tighter and
/// come from the probe descriptor.
const CLIENT_TIMEOUT_SECS: u64 = 30;

/// Shared HTTP client with configured timeout and redirect policy.
pub(crate) static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .unwrap_or_default()
});

/// Parse and normalise a backend base URL.
pub(crate) fn parse_base_url(base_url: &str) -> ProbeResult<Url> {
    Url::parse(base_url.trim())
        .map_err(|e| ProbeError::ValidationError(format!("Invalid base URL {base_url}: {e}")))
}

/// Join the base URL with an absolute API path.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}{}",
        base.as_str().trim_end_matches('/'),
        path
    )
}
