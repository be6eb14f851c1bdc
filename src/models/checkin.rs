// SPDX-License-Identifier: MIT

//! QR check-in payload encoding and decoding.
//!
//! The payload is the only externally-interpreted wire format in the
//! system: a UTF-8 JSON string `{"type":"ATTENDANCE","eventId":...}`.
//! It carries no signature, expiry, or anti-replay token; anyone holding
//! the raw string can attempt a check-in, gated only by the registered
//! precondition in the attendance workflow.

use serde::Deserialize;

/// Discriminator value for attendance payloads.
pub const PAYLOAD_TYPE: &str = "ATTENDANCE";

/// Decoded check-in payload. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInPayload {
    pub event_id: String,
}

/// Payload decode failures. A decode failure must cause no store write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not well-formed JSON")]
    Malformed,

    #[error("payload type is not ATTENDANCE")]
    WrongType,

    #[error("payload is missing eventId")]
    MissingEventId,
}

/// Wire shape of the QR payload. Both fields are checked explicitly so a
/// wrong `type` and a missing `eventId` report distinct errors.
#[derive(Deserialize)]
struct WirePayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "eventId", default)]
    event_id: Option<String>,
}

impl CheckInPayload {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
        }
    }

    /// Serialize to the QR wire string.
    pub fn encode(&self) -> String {
        serde_json::json!({
            "type": PAYLOAD_TYPE,
            "eventId": self.event_id,
        })
        .to_string()
    }

    /// Parse a scanned string. Fails on malformed JSON, a wrong
    /// discriminator, or an absent/blank event id.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let wire: WirePayload =
            serde_json::from_str(raw).map_err(|_| DecodeError::Malformed)?;

        if wire.kind != PAYLOAD_TYPE {
            return Err(DecodeError::WrongType);
        }

        match wire.event_id {
            Some(id) if !id.trim().is_empty() => Ok(Self { event_id: id }),
            _ => Err(DecodeError::MissingEventId),
        }
    }
}
