//! Kavita OPDS URL parsing.
//!
//! Kavita hands every user an OPDS feed URL of the form
//! `http://host:5000/api/opds/<api key>`. It carries both pieces the client needs:
//! the server root and the API key used for plugin authentication.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    /// Matches `<scheme>://<host...>/api/opds/<key>` and captures the root and the key.
    static ref OPDS_URL_REGEX: Regex =
        Regex::new(r"^(?P<base>https?://.+?)/api/opds/(?P<key>[^/?#\s]+)").unwrap();
}

/// Connection parameters extracted from an OPDS URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpdsUrl {
    /// Server root, e.g. `http://host:5000`.
    pub base_url: String,
    /// The user's API key.
    pub api_key: String,
}

impl OpdsUrl {
    /// Splits an OPDS URL into server root and API key.
    ///
    /// # Returns
    ///
    /// * `Ok(OpdsUrl)` - Both parts were found
    /// * `Err(Error::InvalidOpdsUrl)` - The input is empty or not shaped like an OPDS URL
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidOpdsUrl(
                input.to_string(),
                "Kavita OPDS URL is required".to_string(),
            ));
        }

        let caps = OPDS_URL_REGEX.captures(trimmed).ok_or_else(|| {
            Error::InvalidOpdsUrl(
                trimmed.to_string(),
                "expected <server>/api/opds/<api key>".to_string(),
            )
        })?;

        Ok(Self {
            base_url: caps["base"].to_string(),
            api_key: caps["key"].to_string(),
        })
    }
}

impl FromStr for OpdsUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OpdsUrl {
    // The API key is a credential; never print it in full.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/api/opds/***", self.base_url)
    }
}
