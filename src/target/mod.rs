//! # Target Resolution
//!
//! Turns the operator-supplied BPM host into a base URL. A bare domain
//! defaults to `https://`; an explicit `http://` or `https://` prefix is kept
//! so a local instance can be tested over plain HTTP.

use url::Url;

use crate::error::{Result, SmokeError};

pub const STATUS_PATH: &str = "/status";
pub const BILLING_PROFILES_PATH: &str = "/api/profiles/v1";
pub const MANAGED_APPS_PATH: &str = "/api/azure/v1/managedApps";

/// The BPM instance under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    base: Url,
}

impl Target {
    pub fn new(host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(SmokeError::MissingHost);
        }

        let candidate = if has_http_scheme(host) {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        let base = Url::parse(&candidate).map_err(|source| SmokeError::InvalidHost {
            host: host.to_string(),
            source,
        })?;

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Join `path` onto the base URL. An absolute path replaces whatever
    /// path the host carried.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|source| SmokeError::InvalidUrl {
            url: format!("{}{path}", self.base),
            source,
        })
    }
}

fn has_http_scheme(host: &str) -> bool {
    let lower = host.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
