//! Notification payload handed to the agent runtime

use crate::route::RouteTarget;
use serde::{Deserialize, Serialize};

/// What the runtime should do with the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Wake,
}

/// A normalized notification for an accepted inbound email.
///
/// Serializes to the runtime's wake payload:
///
/// ```json
/// {"action":"wake","text":"...","deliver":true,"channel":"telegram","to":"12345"}
/// ```
///
/// `text` carries the email body as untrusted data. Consumers must not
/// treat it as instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub action: Action,
    pub text: String,
    pub deliver: bool,
    pub channel: String,
    pub to: String,
}

impl Notification {
    /// Wake notification for `sender`'s email, routed to `route`.
    #[must_use]
    pub fn wake(route: &RouteTarget, sender: &str, subject: &str, body: &str) -> Self {
        Self {
            action: Action::Wake,
            text: summary(sender, subject, body),
            deliver: true,
            channel: route.channel().to_string(),
            to: route.to().to_string(),
        }
    }
}

/// Human-readable summary. All three values are interpolated verbatim.
#[must_use]
pub fn summary(sender: &str, subject: &str, body: &str) -> String {
    format!("New email from {sender}\nSubject: {subject}\n\n{body}")
}
