//! # Run Configuration
//!
//! Everything a smoke run needs to know, resolved once from the command line
//! and passed by reference into the verifier, the suite assembler and the
//! cases. Nothing in here changes after startup.

use std::fmt;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::error::{Result, SmokeError};

/// Per-request timeout used when none is given on the command line.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Console output level, mirroring a unittest text runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    #[default]
    Minimal,
    Verbose,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Minimal,
            _ => Verbosity::Verbose,
        }
    }

    /// Default `env_logger` filter when `RUST_LOG` is not set.
    pub fn log_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet | Verbosity::Minimal => "warn",
            Verbosity::Verbose => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: String,
    pub user_token: Option<BearerToken>,
    pub azure_subscription_id: Option<String>,
    pub verbosity: Verbosity,
    pub timeout: Duration,
}

impl RunConfig {
    /// Build a configuration for `host` with every optional input absent.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err(SmokeError::MissingHost);
        }

        Ok(Self {
            host,
            user_token: None,
            azure_subscription_id: None,
            verbosity: Verbosity::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let mut config = Self::new(args.bpm_host.as_str())?;
        config.user_token = non_empty(args.user_token.as_deref()).map(BearerToken::new);
        config.azure_subscription_id = non_empty(args.azure_sub_id.as_deref()).map(str::to_string);
        config.verbosity = Verbosity::from_level(args.verbosity);
        config.timeout = Duration::from_secs(args.timeout);
        Ok(config)
    }
}

#[cfg(test)]
impl RunConfig {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.user_token = Some(BearerToken::new(token));
        self
    }

    pub fn with_azure_subscription(mut self, subscription_id: impl Into<String>) -> Self {
        self.azure_subscription_id = Some(subscription_id.into());
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(RunConfig::new("   "), Err(SmokeError::MissingHost)));
    }

    #[test]
    fn host_is_trimmed() {
        let config = RunConfig::new("  bpm.example.org \n").unwrap();
        assert_eq!(config.host, "bpm.example.org");
    }

    #[test]
    fn from_args_drops_blank_optionals() {
        let args = CliArgs::try_parse_from([
            "bpm-smoke-tests",
            "bpm.example.org",
            " ",
            "--azure_sub_id",
            "",
        ])
        .unwrap();
        let config = RunConfig::from_args(&args).unwrap();

        assert!(config.user_token.is_none());
        assert!(config.azure_subscription_id.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn from_args_maps_verbosity_and_timeout() {
        let args = CliArgs::try_parse_from([
            "bpm-smoke-tests",
            "bpm.example.org",
            "-v",
            "2",
            "--timeout",
            "5",
        ])
        .unwrap();
        let config = RunConfig::from_args(&args).unwrap();

        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn token_debug_is_redacted() {
        let config = RunConfig::new("bpm.example.org")
            .unwrap()
            .with_token("ya29.secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ya29.secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
