//! Probe transport abstract trait

use async_trait::async_trait;

use crate::error::ProbeResult;
use crate::types::{ProbeReport, ProbeRequest};

/// Dispatches a built probe request to the backend.
///
/// Implementations return the decoded response envelope without inspecting
/// `success`; classifying a `success: false` envelope is the controller's
/// job. Transport failures (connect, DNS, decode) map to
/// [`crate::ProbeError::NetworkError`]. The platform layer injects the
/// implementation as `Arc<dyn ProbeTransport>`; tests use a scripted mock.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Send one request and decode the response envelope
    async fn dispatch(&self, request: &ProbeRequest) -> ProbeResult<ProbeReport>;
}
