//! Probe dispatch over HTTP

use async_trait::async_trait;
use probedeck_core::{ProbeError, ProbeReport, ProbeRequest, ProbeResult, ProbeTransport};
use url::Url;

use crate::client::{endpoint_url, parse_base_url, HTTP_CLIENT};

/// Sends probe requests as `POST {base}/api/<protocol>/<action>`.
///
/// The request payload goes out verbatim as the JSON body; the response is
/// decoded into the `{success, error?, ...}` envelope with the
/// protocol-specific fields left opaque. The controller holds the
/// authoritative timeout; the one here is a per-request transport bound
/// with the same value.
pub struct HttpProbeTransport {
    base: Url,
}

impl HttpProbeTransport {
    /// Create a transport against a backend base URL
    pub fn new(base_url: &str) -> ProbeResult<Self> {
        Ok(Self {
            base: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl ProbeTransport for HttpProbeTransport {
    async fn dispatch(&self, request: &ProbeRequest) -> ProbeResult<ProbeReport> {
        let url = endpoint_url(&self.base, &request.endpoint);
        log::debug!("[HTTP] POST {url}");

        let response = HTTP_CLIENT
            .post(&url)
            .timeout(std::time::Duration::from_millis(request.timeout_ms))
            .json(&request.payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::NetworkError(format!(
                        "Probe timed out after {}ms",
                        request.timeout_ms
                    ))
                } else {
                    ProbeError::NetworkError(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::NetworkError(format!(
                "Backend returned HTTP {status}"
            )));
        }

        response
            .json::<ProbeReport>()
            .await
            .map_err(|e| ProbeError::NetworkError(format!("Failed to parse response: {e}")))
    }
}
