pub mod definitions;
mod path;
mod remote;
mod settings;

pub use remote::*;
pub use settings::*;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub fn err_server_not_in_config() -> Error {
    anyhow!("server not found in config")
}

pub fn err_no_server_in_config() -> Error {
    anyhow!("no server found in config")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BkpConfig {
    #[serde(default)]
    pub remote: Vec<BkpRemoteServerConfig>,

    #[serde(default = "BkpConfig::default_poll_interval")]
    pub poll_interval: u64,

    #[serde(default)]
    pub settings_defaults: SettingsDefaults,
}

impl BkpConfig {
    fn default_poll_interval() -> u64 {
        definitions::DEFAULT_POLL_INTERVAL_SECS
    }

    pub fn path() -> Result<PathBuf> {
        Ok(crate::path![
            std::env::current_dir()?,
            definitions::TOOL_DIR,
            definitions::TOOL_DEFAULT_CONFIG_FILE
        ])
    }

    /// Loads the configuration of the current directory, falling back to the
    /// defaults when no configuration file exists.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.is_file() {
            debug!("no config file found at: {}", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("loading config file from: {}", path.display());
        let content = read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content).map_err(|e| anyhow!(e))?;
        config.debug_info();
        Ok(config)
    }

    pub fn debug_info(&self) {
        debug!("poll-interval: {}", self.poll_interval);
        for server in &self.remote {
            debug!("remote > {} > url: {}", server.name, server.base_url());
            debug!(
                "remote > {} > token: {}",
                server.name,
                if server.token.is_some() { "********" } else { "none" }
            );
        }
        self.settings_defaults.debug_info();
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.max(1))
    }

    pub fn server(&self, name: &str) -> Result<&BkpRemoteServerConfig> {
        self.remote
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(err_server_not_in_config)
    }

    pub fn nth_server(&self, i: usize) -> Result<&BkpRemoteServerConfig> {
        self.remote.get(i).ok_or_else(err_no_server_in_config)
    }

    pub fn server_or_first(&self, name: Option<&String>) -> Result<&BkpRemoteServerConfig> {
        match name {
            Some(name) => self.server(name),
            None => self.nth_server(0),
        }
    }
}

impl Default for BkpConfig {
    fn default() -> Self {
        Self {
            remote: vec![BkpRemoteServerConfig::default()],
            poll_interval: Self::default_poll_interval(),
            settings_defaults: SettingsDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_text_parses_to_defaults() {
        let config: BkpConfig = serde_yaml_ng::from_str(&definitions::default_config()).unwrap();
        let defaults = BkpConfig::default();

        assert_eq!(config.poll_interval, defaults.poll_interval);
        assert_eq!(config.settings_defaults, defaults.settings_defaults);
        assert_eq!(config.remote.len(), 1);
        assert_eq!(config.remote[0].name, definitions::REMOTE_SERVER_NAME);
    }

    #[test]
    fn server_lookup() {
        let config: BkpConfig = serde_yaml_ng::from_str(
            r"
remote:
  - name: lab
    host: 10.0.0.2
  - name: prod
    host: xo.example.org
    port: 443
    tls: true
    token: secret
",
        )
        .unwrap();

        assert_eq!(config.server_or_first(None).unwrap().name, "lab");
        let prod = config.server_or_first(Some(&"prod".to_string())).unwrap();
        assert_eq!(prod.base_url(), "https://xo.example.org:443");
        assert_eq!(prod.token.as_deref(), Some("secret"));
        assert!(config.server("missing").is_err());
    }

    #[test]
    fn empty_remote_list_is_an_error_on_lookup() {
        let config: BkpConfig = serde_yaml_ng::from_str("poll-interval: 0").unwrap();
        assert!(config.server_or_first(None).is_err());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
