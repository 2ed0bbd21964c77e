use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dog_ceo::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::FailurePolicy;
use crate::error::DogError;

pub const CONFIG_FILE_NAME: &str = "dogfetch.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub failure_policy: Option<FailurePolicy>,
    /// Breed names preselected when a session starts.
    #[serde(default)]
    pub breeds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub breeds: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ConfigLoader::resolve_config(Config::default())
    }
}

/// Settings given on the command line; each one that is set wins over the
/// config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: ResolvedConfig) -> ResolvedConfig {
        if let Some(base_url) = &self.api_base_url {
            config.api_base_url = base_url.clone();
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }
        config
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the explicit `path` if given (it must exist), otherwise the first
    /// of `./dogfetch.json` and the user config dir that exists, otherwise
    /// defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DogError> {
        if let Some(path) = path {
            return Self::load(Path::new(path));
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE_NAME)).chain(user_config_path());
        for candidate in candidates {
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        debug!("no config file found, using defaults");
        Ok(ResolvedConfig::default())
    }

    pub fn load(path: &Path) -> Result<ResolvedConfig, DogError> {
        debug!(path = %path.display(), "reading config");
        let content =
            fs::read_to_string(path).map_err(|_| DogError::ConfigRead(path.to_path_buf()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|err| DogError::ConfigParse(err.to_string()))?;
        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            api_base_url: config
                .api_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                config.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            failure_policy: config.failure_policy.unwrap_or_default(),
            breeds: config.breeds,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dogfetch").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
