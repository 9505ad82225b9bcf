use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use dashboard_engine::{CoordinatorSettings, DashboardSettings, TransportSettings};
use dashboard_logging::dashboard_info;
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

/// Environment variable that overrides the configured service URL.
pub const BASE_URL_ENV: &str = "DASHBOARD_BASE_URL";

/// Settings of the dashboard binary, as stored in a RON file.
///
/// Every field is optional in the file; missing ones keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub refresh_delay_ms: u64,
    pub download_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let transport = TransportSettings::default();
        let coordinator = CoordinatorSettings::default();
        Self {
            base_url: transport.base_url,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            request_timeout_secs: transport.request_timeout.as_secs(),
            refresh_delay_ms: duration_millis(coordinator.refresh_delay),
            download_dir: PathBuf::from("downloads"),
            log_destination: LogDestination::default(),
        }
    }
}

impl DashboardConfig {
    /// Reads `path` if given. A file that does not exist yields the
    /// defaults; one that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        let config = ron::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Applies environment overrides, looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = var(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            dashboard_info!("Base URL taken from {}", BASE_URL_ENV);
            self.base_url = base_url.trim().to_string();
        }
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            transport: TransportSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            coordinator: CoordinatorSettings {
                refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            },
            download_dir: self.download_dir.clone(),
        }
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
