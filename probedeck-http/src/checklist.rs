//! Checklist persistence over HTTP

use async_trait::async_trait;
use probedeck_core::{ChecklistSnapshot, ChecklistStore, ProbeError, ProbeResult};
use serde::Serialize;
use url::Url;

use crate::client::{endpoint_url, parse_base_url, HTTP_CLIENT};

/// Checklist write request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChecklistWriteRequest<'a> {
    protocol_id: &'a str,
    item: &'a str,
    checked: bool,
}

/// Persists checklist state via `GET|POST {base}/api/checklist`.
///
/// Failures come back as [`ProbeError::PersistenceError`] so the optimistic
/// controller can roll back and surface them.
pub struct HttpChecklistStore {
    base: Url,
}

impl HttpChecklistStore {
    /// Create a store against a backend base URL
    pub fn new(base_url: &str) -> ProbeResult<Self> {
        Ok(Self {
            base: parse_base_url(base_url)?,
        })
    }

    fn checklist_url(&self) -> String {
        endpoint_url(&self.base, "/api/checklist")
    }
}

#[async_trait]
impl ChecklistStore for HttpChecklistStore {
    async fn load_all(&self) -> ProbeResult<ChecklistSnapshot> {
        let url = self.checklist_url();
        log::debug!("[HTTP] GET {url}");

        HTTP_CLIENT
            .get(&url)
            .send()
            .await
            .map_err(|e| ProbeError::PersistenceError(format!("Checklist fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| ProbeError::PersistenceError(format!("Checklist fetch failed: {e}")))?
            .json::<ChecklistSnapshot>()
            .await
            .map_err(|e| {
                ProbeError::PersistenceError(format!("Failed to parse checklist: {e}"))
            })
    }

    async fn persist(&self, protocol_id: &str, item: &str, checked: bool) -> ProbeResult<()> {
        let url = self.checklist_url();
        log::debug!("[HTTP] POST {url} ({protocol_id}/{item} = {checked})");

        let body = ChecklistWriteRequest {
            protocol_id,
            item,
            checked,
        };
        HTTP_CLIENT
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProbeError::PersistenceError(format!("Checklist write failed: {e}")))?
            .error_for_status()
            .map_err(|e| ProbeError::PersistenceError(format!("Checklist write failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_request_body_shape() {
        let body = ChecklistWriteRequest {
            protocol_id: "SSH",
            item: "banner-grab",
            checked: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "protocolId": "SSH",
                "item": "banner-grab",
                "checked": true
            })
        );
    }

    #[test]
    fn test_checklist_url() {
        let store = HttpChecklistStore::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            store.checklist_url(),
            "http://127.0.0.1:8080/api/checklist"
        );
    }
}
