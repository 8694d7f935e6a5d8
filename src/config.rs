//! Dashboard configuration, read from the environment (and `.env`).

use std::env;

use crate::error::{DashboardError, Result};
use crate::scenario::MetricMode;

/// Runtime settings for the dashboard server
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Metric mode for sessions that do not ask for one
    pub default_mode: MetricMode,
    /// Upper bound on live sessions
    pub max_sessions: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
            default_mode: MetricMode::CashFlow,
            max_sessions: 1024,
        }
    }
}

impl DashboardConfig {
    /// Load from `RFID_ROI_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("RFID_ROI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("RFID_ROI_PORT") {
            config.port = port
                .parse()
                .map_err(|_| DashboardError::Config(format!("RFID_ROI_PORT='{}' is not a port", port)))?;
        }
        if let Some(mode) = lookup("RFID_ROI_MODE") {
            config.default_mode = mode.parse()?;
        }
        if let Some(max) = lookup("RFID_ROI_MAX_SESSIONS") {
            config.max_sessions = match max.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(DashboardError::Config(format!(
                        "RFID_ROI_MAX_SESSIONS='{}' must be a positive integer",
                        max
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
