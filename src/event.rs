//! Inbound webhook events
//!
//! Parses the provider's webhook payload. The shape is fixed by the
//! provider; only the fields the gate needs are read:
//!
//! ```json
//! {
//!   "event_type": "message.received",
//!   "event_id": "evt_123",
//!   "message": {
//!     "from": [{ "email": "a@x.com", "name": "A" }],
//!     "subject": "Hi",
//!     "text": "Hello",
//!     "inbox_id": "inbox_1",
//!     "message_id": "msg_1",
//!     "thread_id": "thr_1",
//!     "timestamp": "2024-01-01T12:00:00Z"
//!   }
//! }
//! ```

use crate::address::{AddressError, EmailAddress};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Webhook event type as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    MessageReceived,
    MessageSent,
    MessageDelivered,
    MessageBounced,
    /// Any type this crate has no name for.
    Other(String),
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MessageReceived => "message.received",
            Self::MessageSent => "message.sent",
            Self::MessageDelivered => "message.delivered",
            Self::MessageBounced => "message.bounced",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "message.received" => Self::MessageReceived,
            "message.sent" => Self::MessageSent,
            "message.delivered" => Self::MessageDelivered,
            "message.bounced" => Self::MessageBounced,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One entry of the `message.from` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderEntry {
    /// A raw address string, not yet validated.
    Address(String),
    /// An entry with no readable address (wrong type, missing `email`).
    Unreadable,
}

/// Why the sender of an event could not be established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderError {
    Missing,
    /// `raw` is the entry that failed, empty for an unreadable entry.
    Malformed { raw: String, error: AddressError },
}

/// An inbound email event delivered by the provider's webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEmailEvent {
    pub event_type: EventType,
    pub event_id: Option<String>,
    pub from: Vec<SenderEntry>,
    pub subject: String,
    pub text: String,
    pub inbox_id: Option<String>,
    pub message_id: Option<String>,
    pub thread_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct WirePayload {
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    message: Option<WireMessage>,
}

#[derive(Deserialize, Default)]
struct WireMessage {
    #[serde(default)]
    from: Option<Value>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inbox_id: Option<String>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    thread_id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl InboundEmailEvent {
    /// A `message.received` event with a single sender.
    #[must_use]
    pub fn received(from: &str, subject: &str, text: &str) -> Self {
        Self {
            event_type: EventType::MessageReceived,
            event_id: None,
            from: vec![SenderEntry::Address(from.to_string())],
            subject: subject.to_string(),
            text: text.to_string(),
            inbox_id: None,
            message_id: None,
            thread_id: None,
            timestamp: None,
        }
    }

    /// Parse a webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] if the payload is not a JSON
    /// object of the expected shape. A missing or unreadable sender is
    /// not an error here; it surfaces through [`Self::senders`].
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        let wire: WirePayload = serde_json::from_slice(payload)?;
        Ok(Self::from_wire(wire))
    }

    /// Parse a webhook payload from a string.
    ///
    /// # Errors
    ///
    /// See [`Self::from_slice`].
    pub fn from_json(payload: &str) -> Result<Self> {
        Self::from_slice(payload.as_bytes())
    }

    fn from_wire(wire: WirePayload) -> Self {
        let message = wire.message.unwrap_or_default();

        Self {
            event_type: wire
                .event_type
                .as_deref()
                .map_or_else(|| EventType::Other(String::new()), EventType::from),
            event_id: wire.event_id,
            from: message.from.map(sender_entries).unwrap_or_default(),
            subject: message.subject.unwrap_or_default(),
            text: message.text.unwrap_or_default(),
            inbox_id: message.inbox_id,
            message_id: message.message_id,
            thread_id: message.thread_id,
            timestamp: message.timestamp.as_deref().and_then(parse_timestamp),
        }
    }

    /// The normalized sender addresses of this event.
    ///
    /// # Errors
    ///
    /// [`SenderError::Missing`] if there is no sender at all, and
    /// [`SenderError::Malformed`] if any entry is unreadable or not a
    /// valid address.
    pub fn senders(&self) -> std::result::Result<Vec<EmailAddress>, SenderError> {
        if self.from.is_empty() {
            return Err(SenderError::Missing);
        }

        self.from
            .iter()
            .map(|entry| match entry {
                SenderEntry::Address(raw) => EmailAddress::parse(raw).map_err(|e| match e {
                    AddressError::Empty if self.from.len() == 1 => SenderError::Missing,
                    error => SenderError::Malformed {
                        raw: raw.clone(),
                        error,
                    },
                }),
                SenderEntry::Unreadable => Err(SenderError::Malformed {
                    raw: String::new(),
                    error: AddressError::Malformed("unreadable from entry".to_string()),
                }),
            })
            .collect()
    }
}

fn sender_entries(value: Value) -> Vec<SenderEntry> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(sender_entry).collect(),
        other => vec![sender_entry(other)],
    }
}

fn sender_entry(value: Value) -> SenderEntry {
    match value {
        Value::String(s) => SenderEntry::Address(s),
        Value::Object(mut obj) => match obj.remove("email") {
            Some(Value::String(s)) => SenderEntry::Address(s),
            _ => SenderEntry::Unreadable,
        },
        _ => SenderEntry::Unreadable,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
