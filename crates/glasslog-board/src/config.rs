//! Board configuration.

use crate::error::{Error, Result};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for a board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Base URL of the board backend (for `HttpStore`)
    pub backend_url: String,

    /// Team capacity in story points shared by the funded cards
    pub total_capacity: u32,

    /// Length of a voting session
    pub vote_window: Duration,

    /// Countdown refresh interval
    pub tick: Duration,

    /// HTTP request timeout
    pub http_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            total_capacity: 100,
            vote_window: Duration::from_secs(3600),
            tick: Duration::from_secs(1),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl BoardConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// - `GLASSLOG_BACKEND_URL`
    /// - `GLASSLOG_TOTAL_CAPACITY`
    /// - `GLASSLOG_VOTE_WINDOW_SECS`
    /// - `GLASSLOG_TICK_MILLIS`
    /// - `GLASSLOG_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let backend_url = lookup("GLASSLOG_BACKEND_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);

        let total_capacity = parse_var(&lookup, "GLASSLOG_TOTAL_CAPACITY", defaults.total_capacity)?;

        let vote_window = Duration::from_secs(parse_var(
            &lookup,
            "GLASSLOG_VOTE_WINDOW_SECS",
            defaults.vote_window.as_secs(),
        )?);

        let tick_millis = parse_var(&lookup, "GLASSLOG_TICK_MILLIS", defaults.tick.as_millis() as u64)?;
        if tick_millis == 0 {
            return Err(Error::Validation("GLASSLOG_TICK_MILLIS must be positive".into()));
        }

        let http_timeout = Duration::from_secs(parse_var(
            &lookup,
            "GLASSLOG_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?);

        Ok(Self {
            backend_url,
            total_capacity,
            vote_window,
            tick: Duration::from_millis(tick_millis),
            http_timeout,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            tracing::warn!("Invalid {name} value {raw:?}: {e}");
            Error::Validation(format!("invalid {name}: {e}"))
        }),
        None => {
            tracing::debug!("{name} not set, using default: {default}");
            Ok(default)
        }
    }
}
