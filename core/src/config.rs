// Console configuration
//
// Defaults match the management server's web console; every value can be overridden from the
// environment.

use crate::breadcrumbs::BreadcrumbOrder;
use crate::timer::REFRESH_INTERVAL;
use crate::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Console configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// URL of the dashboard page; server endpoints are resolved relative to it
    pub page_url: String,
    /// Period of the refresh timer in milliseconds
    pub refresh_interval_ms: u64,
    /// Per-request timeout; `None` leaves fetches unbounded
    pub request_timeout_ms: Option<u64>,
    /// Initial state of the auto refresh checkbox
    pub auto_refresh: bool,
    pub breadcrumb_order: BreadcrumbOrder,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_url: "http://localhost:8081/dashboard/".to_string(),
            refresh_interval_ms: REFRESH_INTERVAL.as_millis() as u64,
            request_timeout_ms: None,
            auto_refresh: true,
            breadcrumb_order: BreadcrumbOrder::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            page_url: std::env::var("CONSOLE_PAGE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(default.page_url),
            refresh_interval_ms: env_value("CONSOLE_REFRESH_MS", |v| v.parse().ok())
                .unwrap_or(default.refresh_interval_ms),
            request_timeout_ms: env_value("CONSOLE_REQUEST_TIMEOUT_MS", |v| v.parse().ok())
                .or(default.request_timeout_ms),
            auto_refresh: env_value("CONSOLE_AUTO_REFRESH", parse_flag)
                .unwrap_or(default.auto_refresh),
            breadcrumb_order: env_value("CONSOLE_BREADCRUMB_ORDER", |v| v.parse().ok())
                .unwrap_or(default.breadcrumb_order),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(ConsoleError::Config(
                "refresh_interval_ms must be greater than zero".into(),
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConsoleError::Config(
                "request_timeout_ms must be greater than zero when set".into(),
            ));
        }
        reqwest::Url::parse(&self.page_url).map_err(|e| ConsoleError::InvalidUrl {
            url: self.page_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Read and parse `key`; a set but unparsable value is logged and ignored
fn env_value<T>(key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    parse_value(key, &raw, parse)
}

fn parse_value<T>(key: &str, raw: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let value = parse(raw.trim());
    if value.is_none() {
        warn!(target: "config", key, value = raw, "Ignoring unparsable environment value");
    }
    value
}

/// `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`, any case
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
