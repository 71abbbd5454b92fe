//! Inbound email gate for agent runtimes
//!
//! Filters webhook events from a hosted email provider before they
//! reach an agent. An event wakes the agent only when every sender
//! address is on a fixed allowlist; anything else, including events
//! with a missing or unreadable sender, is dropped and logged under the
//! `mail_gate::audit` tracing target.
//!
//! Accepted events become a [`Notification`] routed to a static
//! [`RouteTarget`]. The email body is passed through as untrusted text
//! and never interpreted.
//!
//! ```
//! use mail_gate::{Allowlist, Decision, InboundEmailEvent, InboundFilter, RouteTarget};
//!
//! let filter = InboundFilter::new(
//!     Allowlist::new(["a@x.com"]).unwrap(),
//!     RouteTarget::new("telegram", "12345").unwrap(),
//! );
//!
//! let event = InboundEmailEvent::received("A@X.com", "Hi", "Hello");
//! assert!(matches!(filter.evaluate(&event), Decision::Notify(_)));
//! ```

mod address;
mod allowlist;
mod config;
mod error;
mod event;
mod filter;
mod notification;
mod route;
#[cfg(feature = "server")]
pub mod webhook;

pub use address::{AddressError, EmailAddress};
pub use allowlist::Allowlist;
pub use config::FilterConfig;
pub use error::{Error, Result};
pub use event::{EventType, InboundEmailEvent, SenderEntry, SenderError};
pub use filter::{Decision, DropReason, InboundFilter};
pub use notification::{Action, Notification, summary};
pub use route::RouteTarget;
