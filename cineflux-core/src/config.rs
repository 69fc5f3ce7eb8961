use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration, persisted as JSON in the platform config dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the content/account service
    pub server_url: String,
    /// Wall-clock seconds between scheduled progress reports
    pub report_interval_secs: u64,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8001".to_string(),
            report_interval_secs: 30,
            http_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("cineflux").join("config.json");
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = serde_json::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("cineflux");
            std::fs::create_dir_all(&app_dir)?;
            let config_path = app_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }
}
