//! Link and rendering settings
//!
//! Defaults match the backend's development setup. The CLI reads overrides
//! from `ARM_*` environment variables; the dashboard takes its URL from a
//! page global.

use crate::core::{ReconnectPolicy, DEFAULT_LOOKBACK, DEFAULT_SMOOTHING_RATE};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default live-feed endpoint
pub const DEFAULT_WS_URL: &str = "ws://localhost:8000/ws";

#[derive(Clone, Debug, PartialEq)]
pub struct LinkConfig {
    pub url: String,
    pub reconnect: ReconnectPolicy,
    pub smoothing_rate: f64,
    pub lookback: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            smoothing_rate: DEFAULT_SMOOTHING_RATE,
            lookback: DEFAULT_LOOKBACK,
        }
    }
}

impl LinkConfig {
    /// Overrides from `ARM_WS`, `ARM_RECONNECT_MS`, `ARM_RECONNECT_JITTER_MS`,
    /// `ARM_RECONNECT_MAX`, `ARM_SMOOTHING` and `ARM_LOOKBACK`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("ARM_WS").filter(|u| !u.trim().is_empty()) {
            config.url = url.trim().to_string();
        }
        if let Some(ms) = parsed::<u64>(&lookup, "ARM_RECONNECT_MS") {
            config.reconnect.delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parsed::<u64>(&lookup, "ARM_RECONNECT_JITTER_MS") {
            config.reconnect.jitter = Duration::from_millis(ms);
        }
        if let Some(max) = parsed::<u32>(&lookup, "ARM_RECONNECT_MAX") {
            config.reconnect.max_attempts = (max > 0).then_some(max);
        }
        if let Some(rate) = parsed::<f64>(&lookup, "ARM_SMOOTHING") {
            if rate.is_finite() && rate > 0.0 {
                config.smoothing_rate = rate;
            } else {
                warn!(rate, "ARM_SMOOTHING must be positive, keeping default");
            }
        }
        if let Some(lookback) = parsed::<usize>(&lookup, "ARM_LOOKBACK") {
            config.lookback = lookback.max(1);
        }
        config
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            None
        }
    }
}
