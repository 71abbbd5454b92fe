//! Filter configuration

use crate::error::{Error, Result};
use std::env;

/// Allowlist and routing target for the inbound filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub allowed_senders: Vec<String>,
    pub channel: String,
    pub to: String,
}

impl FilterConfig {
    /// Load filter configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `MAIL_GATE_ALLOWED_SENDERS` (comma-separated addresses)
    /// - `MAIL_GATE_CHANNEL`
    /// - `MAIL_GATE_TO`
    ///
    /// Values are only checked for presence here; emptiness and address
    /// shape are checked when the filter is built.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            allowed_senders: split_list(
                &env::var("MAIL_GATE_ALLOWED_SENDERS")
                    .map_err(|_| Error::Config("MAIL_GATE_ALLOWED_SENDERS not set".into()))?,
            ),
            channel: env::var("MAIL_GATE_CHANNEL")
                .map_err(|_| Error::Config("MAIL_GATE_CHANNEL not set".into()))?,
            to: env::var("MAIL_GATE_TO")
                .map_err(|_| Error::Config("MAIL_GATE_TO not set".into()))?,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_skips_blanks() {
        assert_eq!(
            split_list(" a@x.com, ,B@y.com ,"),
            vec!["a@x.com".to_string(), "B@y.com".to_string()]
        );
    }

    #[test]
    fn split_list_empty() {
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }
}
