//! Probe lifecycle controller

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::timeout;

use crate::error::ProbeError;
use crate::history::{HistoryEntry, HistoryRing};
use crate::traits::ProbeTransport;
use crate::types::{FieldValues, ProbeReport, ProbeState, ProtocolDescriptor, ValidationResult};
use crate::validation::ValidationEngine;

/// How one invocation settled, surfaced to the panel layer.
///
/// Every path is a value; no error leaves the controller unresolved.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// Validation failed; nothing was dispatched
    Rejected(ValidationResult),
    /// The backend confirmed success
    Success(ProbeReport),
    /// Network, timeout or backend-reported failure
    Failed(ProbeError),
    /// A newer invocation was issued while this one was in flight;
    /// visible state was left to the newer one
    Superseded,
}

/// Orchestrates one request lifecycle: validate → issue → await → settle.
///
/// One instance per panel. The descriptor is the controller's immutable
/// configuration; the transport is the injected backend seam. A
/// monotonically increasing generation counter identifies the most recent
/// invocation so a slow, stale response can never overwrite the state
/// produced by a newer one.
pub struct ProbeController {
    descriptor: ProtocolDescriptor,
    transport: Arc<dyn ProbeTransport>,
    state: RwLock<ProbeState>,
    last_success: RwLock<Option<ProbeReport>>,
    history: RwLock<HistoryRing>,
    generation: AtomicU64,
}

impl ProbeController {
    /// Create a controller for one panel
    #[must_use]
    pub fn new(descriptor: ProtocolDescriptor, transport: Arc<dyn ProbeTransport>) -> Self {
        let history = HistoryRing::with_capacity(descriptor.history_capacity);
        Self {
            descriptor,
            transport,
            state: RwLock::new(ProbeState::Idle),
            last_success: RwLock::new(None),
            history: RwLock::new(history),
            generation: AtomicU64::new(0),
        }
    }

    /// The descriptor this controller was configured with
    #[must_use]
    pub fn descriptor(&self) -> &ProtocolDescriptor {
        &self.descriptor
    }

    /// Current lifecycle state
    pub async fn state(&self) -> ProbeState {
        self.state.read().await.clone()
    }

    /// The most recent successful report.
    ///
    /// Retained across later failures so the panel can keep a previously
    /// displayed result visible next to the error message.
    pub async fn last_success(&self) -> Option<ProbeReport> {
        self.last_success.read().await.clone()
    }

    /// Past successful results, newest first
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await.to_list()
    }

    /// Run one probe: validate, dispatch, settle.
    ///
    /// Validation failures return [`ProbeOutcome::Rejected`] without
    /// building or dispatching a request. A settlement belonging to a
    /// superseded invocation returns [`ProbeOutcome::Superseded`] and does
    /// not touch visible state; every invocation supersedes older in-flight
    /// ones, whether or not it passes validation.
    pub async fn invoke(&self, fields: &FieldValues) -> ProbeOutcome {
        // Bumped before validation so even a rejected invocation fences an
        // older in-flight request.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = ProbeState::Validating;

        let validation = ValidationEngine::validate(fields, &self.descriptor.rules);
        if !validation.is_valid() {
            log::debug!(
                "[Probe] {} rejected: {} field error(s)",
                self.descriptor.endpoint(),
                validation.errors().len()
            );
            *self.state.write().await = ProbeState::Idle;
            return ProbeOutcome::Rejected(validation);
        }

        let request = match self.descriptor.build_request(fields) {
            Ok(request) => request,
            Err(errors) => {
                *self.state.write().await = ProbeState::Idle;
                return ProbeOutcome::Rejected(errors);
            }
        };

        *self.state.write().await = ProbeState::Pending;
        log::debug!(
            "[Probe] {} dispatch, generation {generation}, timeout {}ms",
            request.endpoint,
            request.timeout_ms
        );

        let settled = match timeout(
            Duration::from_millis(request.timeout_ms),
            self.transport.dispatch(&request),
        )
        .await
        {
            Err(_) => Err(ProbeError::NetworkError(format!(
                "Probe timed out after {}ms",
                request.timeout_ms
            ))),
            Ok(Err(err)) => Err(err),
            Ok(Ok(report)) if report.success => Ok(report),
            Ok(Ok(report)) => Err(ProbeError::ProtocolError(
                report
                    .error
                    .unwrap_or_else(|| "Probe reported failure".to_string()),
            )),
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!(
                "[Probe] {} stale settlement for generation {generation} discarded",
                request.endpoint
            );
            return ProbeOutcome::Superseded;
        }

        match settled {
            Ok(report) => {
                if self.descriptor.track_history {
                    self.history.write().await.push(report.clone());
                }
                *self.last_success.write().await = Some(report.clone());
                *self.state.write().await = ProbeState::Success(report.clone());
                ProbeOutcome::Success(report)
            }
            Err(err) => {
                if err.is_expected() {
                    log::warn!("[Probe] {} failed: {err}", request.endpoint);
                } else {
                    log::error!("[Probe] {} failed: {err}", request.endpoint);
                }
                *self.state.write().await = ProbeState::Error(err.to_string());
                ProbeOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::test_utils::MockTransport;
    use serde_json::{Map, Value};

    fn chargen_controller(transport: Arc<MockTransport>) -> ProbeController {
        let descriptor = catalog::find("chargen", "generate").unwrap();
        ProbeController::new(descriptor, transport)
    }

    fn chargen_fields(host: &str, port: &str) -> FieldValues {
        let mut fields = FieldValues::new();
        fields.insert("host".to_string(), host.to_string());
        fields.insert("port".to_string(), port.to_string());
        fields
    }

    fn success_report(tag: &str) -> ProbeReport {
        let mut payload = Map::new();
        payload.insert("data".to_string(), Value::from(tag));
        ProbeReport::ok(payload)
    }

    #[tokio::test]
    async fn test_validation_gates_network() {
        let transport = Arc::new(MockTransport::new());
        let controller = chargen_controller(Arc::clone(&transport));

        let outcome = controller.invoke(&chargen_fields("", "19")).await;
        let ProbeOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.error_for("host"), Some("Host is required"));
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(transport.dispatch_count().await, 0);
        assert_eq!(controller.state().await, ProbeState::Idle);
    }

    #[tokio::test]
    async fn test_valid_fields_dispatch_exactly_once() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(Ok(success_report("A"))).await;
        let controller = chargen_controller(Arc::clone(&transport));

        let outcome = controller.invoke(&chargen_fields("localhost", "19")).await;
        assert!(matches!(outcome, ProbeOutcome::Success(_)));

        let dispatched = transport.dispatched().await;
        assert_eq!(dispatched.len(), 1);
        let request = &dispatched[0];
        assert_eq!(request.endpoint, "/api/chargen/generate");
        assert_eq!(request.payload.get("host"), Some(&Value::from("localhost")));
        assert_eq!(request.payload.get("port"), Some(&Value::from(19)));
        assert_eq!(request.payload.get("maxBytes"), Some(&Value::from(10_240)));
        assert_eq!(request.payload.get("timeout"), Some(&Value::from(10_000)));
    }

    #[tokio::test]
    async fn test_success_updates_state_and_history() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(Ok(success_report("A"))).await;
        let controller = chargen_controller(Arc::clone(&transport));

        controller.invoke(&chargen_fields("localhost", "19")).await;

        assert!(matches!(controller.state().await, ProbeState::Success(_)));
        let history = controller.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].report.payload.get("data"),
            Some(&Value::from("A"))
        );
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_protocol_error() {
        let transport = Arc::new(MockTransport::new());
        transport
            .enqueue(Ok(ProbeReport::failed("Connection refused")))
            .await;
        let controller = chargen_controller(Arc::clone(&transport));

        let outcome = controller.invoke(&chargen_fields("localhost", "19")).await;
        assert!(matches!(
            outcome,
            ProbeOutcome::Failed(ProbeError::ProtocolError(_))
        ));
        assert_eq!(
            controller.state().await,
            ProbeState::Error("Protocol error: Connection refused".to_string())
        );
        assert!(controller.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_error_keeps_last_success() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(Ok(success_report("A"))).await;
        transport
            .enqueue(Err(ProbeError::NetworkError("connect refused".to_string())))
            .await;
        let controller = chargen_controller(Arc::clone(&transport));
        let fields = chargen_fields("localhost", "19");

        controller.invoke(&fields).await;
        controller.invoke(&fields).await;

        assert!(matches!(controller.state().await, ProbeState::Error(_)));
        let retained = controller.last_success().await.unwrap();
        assert_eq!(retained.payload.get("data"), Some(&Value::from("A")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_settles_as_network_error() {
        let transport = Arc::new(MockTransport::new());
        // Longer than the 10s chargen timeout.
        transport.enqueue_delayed(20_000, Ok(success_report("late"))).await;
        let controller = chargen_controller(Arc::clone(&transport));

        let outcome = controller.invoke(&chargen_fields("localhost", "19")).await;
        let ProbeOutcome::Failed(ProbeError::NetworkError(message)) = outcome else {
            panic!("expected network error");
        };
        assert!(message.contains("timed out"));
        assert!(matches!(controller.state().await, ProbeState::Error(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_delayed(100, Ok(success_report("old"))).await;
        transport.enqueue_delayed(10, Ok(success_report("new"))).await;
        let controller = chargen_controller(Arc::clone(&transport));
        let fields = chargen_fields("localhost", "19");

        let (first, second) = tokio::join!(controller.invoke(&fields), controller.invoke(&fields));

        assert!(matches!(first, ProbeOutcome::Superseded));
        let ProbeOutcome::Success(report) = second else {
            panic!("expected newer invocation to win");
        };
        assert_eq!(report.payload.get("data"), Some(&Value::from("new")));

        // Visible state and history reflect the newer generation only.
        let ProbeState::Success(visible) = controller.state().await else {
            panic!("expected success state");
        };
        assert_eq!(visible.payload.get("data"), Some(&Value::from("new")));
        let history = controller.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].report.payload.get("data"),
            Some(&Value::from("new"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_failure_does_not_clobber_newer_success() {
        let transport = Arc::new(MockTransport::new());
        transport
            .enqueue_delayed(100, Err(ProbeError::NetworkError("slow failure".to_string())))
            .await;
        transport.enqueue_delayed(10, Ok(success_report("new"))).await;
        let controller = chargen_controller(Arc::clone(&transport));
        let fields = chargen_fields("localhost", "19");

        let (first, _second) = tokio::join!(controller.invoke(&fields), controller.invoke(&fields));

        assert!(matches!(first, ProbeOutcome::Superseded));
        assert!(matches!(controller.state().await, ProbeState::Success(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_invocation_fences_inflight_request() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_delayed(100, Ok(success_report("old"))).await;
        let controller = chargen_controller(Arc::clone(&transport));

        let valid_fields = chargen_fields("localhost", "19");
        let rejected_fields = chargen_fields("", "19");
        let (first, second) = tokio::join!(
            controller.invoke(&valid_fields),
            controller.invoke(&rejected_fields)
        );

        // The rejection supersedes the in-flight probe: its late success
        // must not surface, and the visible trace stays at Idle.
        assert!(matches!(first, ProbeOutcome::Superseded));
        assert!(matches!(second, ProbeOutcome::Rejected(_)));
        assert_eq!(controller.state().await, ProbeState::Idle);
        assert!(controller.history().await.is_empty());
        assert!(controller.last_success().await.is_none());
        assert_eq!(transport.dispatch_count().await, 1);
    }

    #[tokio::test]
    async fn test_history_disabled_descriptor() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(Ok(success_report("A"))).await;
        let descriptor = catalog::find("chargen", "generate").unwrap().without_history();
        let controller = ProbeController::new(descriptor, transport.clone());

        controller.invoke(&chargen_fields("localhost", "19")).await;
        assert!(controller.history().await.is_empty());
        assert!(matches!(controller.state().await, ProbeState::Success(_)));
    }
}
