use std::fs;
use std::path::Path;

use console_core::{BreadcrumbOrder, ConsoleConfig};

/// High-level configuration for the console app
#[derive(Clone, Debug, Default)]
pub struct ConsoleAppConfig {
    pub console: ConsoleConfig,
}

impl ConsoleAppConfig {
    /// Load configuration from a TOML file (path via CONSOLE_CONFIG or ./console.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self {
            console: ConsoleConfig::from_env(),
        };
        let path = std::env::var("CONSOLE_CONFIG").unwrap_or_else(|_| "console.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "console", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match Self::parse(&s, default.clone()) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(target: "console", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "console", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    fn parse(s: &str, base: Self) -> Result<Self, toml::de::Error> {
        Ok(toml::from_str::<ConsoleAppToml>(s)?.overlay(base))
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ConsoleAppToml {
    pub server: Option<ServerToml>,
    pub refresh: Option<RefreshToml>,
    pub breadcrumbs: Option<BreadcrumbsToml>,
}

impl ConsoleAppToml {
    fn overlay(self, mut base: ConsoleAppConfig) -> ConsoleAppConfig {
        if let Some(s) = self.server {
            s.apply(&mut base.console);
        }
        if let Some(r) = self.refresh {
            r.apply(&mut base.console);
        }
        if let Some(b) = self.breadcrumbs {
            b.apply(&mut base.console);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ServerToml {
    pub page_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}
impl ServerToml {
    fn apply(self, c: &mut ConsoleConfig) {
        if let Some(x) = self.page_url {
            c.page_url = x;
        }
        if let Some(x) = self.request_timeout_ms {
            c.request_timeout_ms = Some(x);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct RefreshToml {
    pub interval_ms: Option<u64>,
    pub auto_refresh: Option<bool>,
}
impl RefreshToml {
    fn apply(self, c: &mut ConsoleConfig) {
        if let Some(x) = self.interval_ms {
            c.refresh_interval_ms = x;
        }
        if let Some(x) = self.auto_refresh {
            c.auto_refresh = x;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct BreadcrumbsToml {
    pub order: Option<BreadcrumbOrder>,
}
impl BreadcrumbsToml {
    fn apply(self, c: &mut ConsoleConfig) {
        if let Some(x) = self.order {
            c.breadcrumb_order = x;
        }
    }
}
