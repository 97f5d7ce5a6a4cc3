//! Built-in protocol panel descriptors
//!
//! One declarative descriptor per backend protocol; the probe controller is
//! generic over them. The set mirrors the RFC test services the backend
//! exposes: Echo (7), Discard (9), Daytime (13), Chargen (19), Time (37)
//! and Finger (79).

use crate::types::{FieldRule, FieldSpec, ProtocolDescriptor};

/// Finger servers are observed to answer slowly; give them more headroom.
const FINGER_TIMEOUT_MS: u64 = 15_000;

/// Chargen output cap the backend enforces, bytes
const CHARGEN_DEFAULT_MAX_BYTES: &str = "10240";

fn host_rules() -> Vec<FieldRule> {
    vec![FieldRule::required("Host is required")]
}

fn port_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::required("Port is required"),
        FieldRule::port("Port must be between 1 and 65535"),
    ]
}

fn echo() -> ProtocolDescriptor {
    ProtocolDescriptor::new("echo", "send")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("7"))
        .field(FieldSpec::text("payload"))
        .rules("host", host_rules())
        .rules("port", port_rules())
        .rules(
            "payload",
            vec![
                FieldRule::required("Payload is required"),
                FieldRule::max_length(4096, "Payload must be at most 4096 characters"),
            ],
        )
}

fn discard() -> ProtocolDescriptor {
    ProtocolDescriptor::new("discard", "send")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("9"))
        .field(FieldSpec::text("payload"))
        .rules("host", host_rules())
        .rules("port", port_rules())
        .rules(
            "payload",
            vec![
                FieldRule::required("Payload is required"),
                FieldRule::max_length(4096, "Payload must be at most 4096 characters"),
            ],
        )
}

fn daytime() -> ProtocolDescriptor {
    ProtocolDescriptor::new("daytime", "query")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("13"))
        .rules("host", host_rules())
        .rules("port", port_rules())
}

fn chargen() -> ProtocolDescriptor {
    ProtocolDescriptor::new("chargen", "generate")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("19"))
        .field(FieldSpec::integer("maxBytes").with_default(CHARGEN_DEFAULT_MAX_BYTES))
        .rules("host", host_rules())
        .rules("port", port_rules())
        .rules(
            "maxBytes",
            vec![FieldRule::int_range(
                1,
                1_048_576,
                "maxBytes must be between 1 and 1048576",
            )],
        )
}

fn time() -> ProtocolDescriptor {
    ProtocolDescriptor::new("time", "query")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("37"))
        .rules("host", host_rules())
        .rules("port", port_rules())
}

fn finger() -> ProtocolDescriptor {
    ProtocolDescriptor::new("finger", "query")
        .field(FieldSpec::text("host"))
        .field(FieldSpec::port("port").with_default("79"))
        .field(FieldSpec::text("user"))
        .rules("host", host_rules())
        .rules("port", port_rules())
        .rules(
            "user",
            vec![FieldRule::max_length(
                64,
                "User must be at most 64 characters",
            )],
        )
        .timeout_ms(FINGER_TIMEOUT_MS)
}

/// All built-in descriptors
#[must_use]
pub fn builtin() -> Vec<ProtocolDescriptor> {
    vec![echo(), discard(), daytime(), chargen(), time(), finger()]
}

/// Look up one descriptor by protocol and action
#[must_use]
pub fn find(protocol: &str, action: &str) -> Option<ProtocolDescriptor> {
    builtin()
        .into_iter()
        .find(|descriptor| descriptor.protocol == protocol && descriptor.action == action)
}
