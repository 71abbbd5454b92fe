//! Inbound event filter
//!
//! Gates inbound webhook events on the sender allowlist before anything
//! reaches the agent runtime. Any event whose sender cannot be
//! established, or is not on the allowlist, is dropped. There is no
//! fall-through to "process".

use crate::allowlist::Allowlist;
use crate::config::FilterConfig;
use crate::error::Result;
use crate::event::{InboundEmailEvent, SenderEntry, SenderError};
use crate::notification::Notification;
use crate::route::RouteTarget;
use std::fmt;
use tracing::{debug, info, warn};

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    NotAllowlisted,
    MissingSender,
    MalformedSender,
    MalformedPayload,
}

impl DropReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAllowlisted => "not-allowlisted",
            Self::MissingSender => "missing-sender",
            Self::MalformedSender => "malformed-sender",
            Self::MalformedPayload => "malformed-payload",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of filtering one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Drop(DropReason),
    Notify(Notification),
}

impl Decision {
    #[must_use]
    pub const fn is_drop(&self) -> bool {
        matches!(self, Self::Drop(_))
    }

    /// The wire result: `None` means drop, take no action.
    #[must_use]
    pub fn into_output(self) -> Option<Notification> {
        match self {
            Self::Drop(_) => None,
            Self::Notify(n) => Some(n),
        }
    }
}

/// Stateless allowlist filter for inbound email events.
///
/// Holds only read-only configuration, so one instance can be shared
/// (e.g. behind an `Arc`) by any number of concurrent handlers.
#[derive(Debug, Clone)]
pub struct InboundFilter {
    allowlist: Allowlist,
    route: RouteTarget,
}

impl InboundFilter {
    #[must_use]
    pub const fn new(allowlist: Allowlist, route: RouteTarget) -> Self {
        Self { allowlist, route }
    }

    /// Build a filter from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the allowlist is empty or
    /// contains an invalid address, or the routing target is blank.
    pub fn from_config(config: FilterConfig) -> Result<Self> {
        let allowlist = Allowlist::new(&config.allowed_senders)?;
        let route = RouteTarget::new(config.channel, config.to)?;
        info!(
            "Inbound filter ready: {} allowlisted sender(s), routing to {}:{}",
            allowlist.len(),
            route.channel(),
            route.to()
        );
        for sender in allowlist.iter() {
            debug!("Allowlisted sender: {}", sender);
        }
        Ok(Self::new(allowlist, route))
    }

    #[must_use]
    pub const fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    #[must_use]
    pub const fn route(&self) -> &RouteTarget {
        &self.route
    }

    /// Decide whether `event` wakes the agent.
    ///
    /// With several `from` addresses every one of them must be
    /// allowlisted.
    #[must_use]
    pub fn evaluate(&self, event: &InboundEmailEvent) -> Decision {
        let senders = match event.senders() {
            Ok(senders) => senders,
            Err(SenderError::Missing) => return reject(event, "", DropReason::MissingSender),
            Err(SenderError::Malformed { raw, error }) => {
                debug!("Malformed sender on inbound event: {}", error);
                return reject(event, &raw, DropReason::MalformedSender);
            }
        };

        if let Some(stranger) = senders.iter().find(|s| !self.allowlist.contains(s)) {
            return reject(event, stranger.as_str(), DropReason::NotAllowlisted);
        }

        let sender_text = event
            .from
            .iter()
            .filter_map(|entry| match entry {
                SenderEntry::Address(raw) => Some(raw.trim()),
                SenderEntry::Unreadable => None,
            })
            .collect::<Vec<_>>()
            .join(", ");

        info!(
            "Accepted {} from {} (message {})",
            event.event_type,
            sender_text,
            event.message_id.as_deref().unwrap_or("-")
        );

        Decision::Notify(Notification::wake(
            &self.route,
            &sender_text,
            &event.subject,
            &event.text,
        ))
    }

    /// Parse a raw webhook payload and evaluate it.
    ///
    /// A payload that does not parse is dropped, never returned as an
    /// error.
    #[must_use]
    pub fn evaluate_json(&self, payload: &[u8]) -> Decision {
        match InboundEmailEvent::from_slice(payload) {
            Ok(event) => self.evaluate(&event),
            Err(e) => {
                warn!(
                    target: "mail_gate::audit",
                    sender = "",
                    reason = %DropReason::MalformedPayload,
                    error = %e,
                    "Dropped inbound event"
                );
                Decision::Drop(DropReason::MalformedPayload)
            }
        }
    }
}

/// Audit record for a dropped event. `sender` is the address that
/// caused the drop.
fn reject(event: &InboundEmailEvent, sender: &str, reason: DropReason) -> Decision {
    warn!(
        target: "mail_gate::audit",
        sender,
        reason = %reason,
        event_type = %event.event_type,
        message_id = event.message_id.as_deref().unwrap_or("-"),
        "Dropped inbound event"
    );
    Decision::Drop(reason)
}
