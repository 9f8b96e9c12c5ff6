//! Session configuration

use core::fmt;
use std::str::FromStr;
use std::time::Duration;

use mxtrace_core::{FractionConfig, MxError, Result};

pub const ENV_BACKEND_URL: &str = "MXTRACE_BACKEND_URL";
pub const ENV_TIMEOUT_MS: &str = "MXTRACE_TIMEOUT_MS";
pub const ENV_FALLBACK: &str = "MXTRACE_FALLBACK";
pub const ENV_MAX_DENOMINATOR: &str = "MXTRACE_MAX_DENOMINATOR";

/// What a session does when its delegate fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FallbackPolicy {
    /// Report the failure as an error
    #[default]
    Strict,
    /// Compute locally and attach a notice
    Local,
}

impl FromStr for FallbackPolicy {
    type Err = MxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "local" => Ok(Self::Local),
            _ => Err(MxError::InvalidConfig {
                key: "fallback".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Local => "local",
        })
    }
}

/// Configuration for a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Rendering of scalars in traces
    pub fractions: FractionConfig,
    pub fallback: FallbackPolicy,
    /// Root URL of a remote arithmetic service, if any
    pub backend_url: Option<String>,
    /// Per-request timeout for the remote service
    pub timeout: Duration,
    /// Largest cell difference at which a remote reduction still agrees
    pub agreement_tolerance: f64,
}

impl SessionConfig {
    pub fn with_fractions(mut self, fractions: FractionConfig) -> Self {
        self.fractions = fractions;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_agreement_tolerance(mut self, tolerance: f64) -> Self {
        self.agreement_tolerance = tolerance;
        self
    }

    /// Defaults overridden by `MXTRACE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|u| !u.trim().is_empty()) {
            config.backend_url = Some(url.trim().to_string());
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            config.timeout = Duration::from_millis(parse_var(ENV_TIMEOUT_MS, &ms)?);
        }
        if let Some(policy) = lookup(ENV_FALLBACK) {
            config.fallback = policy.parse().map_err(|_| invalid(ENV_FALLBACK, &policy))?;
        }
        if let Some(den) = lookup(ENV_MAX_DENOMINATOR) {
            config.fractions = config
                .fractions
                .with_max_denominator(parse_var(ENV_MAX_DENOMINATOR, &den)?);
        }

        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fractions: FractionConfig::default(),
            fallback: FallbackPolicy::Strict,
            backend_url: None,
            timeout: Duration::from_secs(5),
            agreement_tolerance: 1e-9,
        }
    }
}

fn parse_var(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> MxError {
    MxError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}
