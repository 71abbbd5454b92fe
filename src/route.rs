//! Notification routing target

use crate::error::{Error, Result};

/// Where accepted events are delivered: a channel name plus a
/// destination identifier within that channel.
///
/// Always comes from configuration, never from the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    channel: String,
    to: String,
}

impl RouteTarget {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either field is blank.
    pub fn new(channel: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let channel = channel.into().trim().to_string();
        let to = to.into().trim().to_string();

        if channel.is_empty() {
            return Err(Error::Config("Routing channel is empty".into()));
        }
        if to.is_empty() {
            return Err(Error::Config("Routing destination is empty".into()));
        }

        Ok(Self { channel, to })
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }
}
