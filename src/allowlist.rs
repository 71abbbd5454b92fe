//! Trusted sender allowlist

use crate::address::EmailAddress;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// The set of trusted sender addresses.
///
/// Built once at startup and never mutated. Membership is exact
/// equality on the case-normalized address; there are no wildcards or
/// domain rules.
#[derive(Debug, Clone)]
pub struct Allowlist {
    entries: HashSet<EmailAddress>,
}

impl Allowlist {
    /// Build an allowlist from raw address strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no entries are given or any entry
    /// is not a valid address. An empty allowlist is refused rather
    /// than treated as "allow all".
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                EmailAddress::parse(raw)
                    .map_err(|e| Error::Config(format!("Invalid allowlist entry '{raw}': {e}")))
            })
            .collect::<Result<HashSet<_>>>()?;

        if entries.is_empty() {
            return Err(Error::Config("Allowlist is empty".into()));
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn contains(&self, address: &EmailAddress) -> bool {
        self.entries.contains(address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed allowlist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmailAddress> {
        self.entries.iter()
    }
}
