use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::geo::BoundingBox;

pub const DEFAULT_ENDPOINT: &str = "https://opensky-network.org/api/states/all";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Replacement for the embedded carrier/airport/route tables.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Opensky,
    /// No outbound requests; every refresh serves synthetic traffic.
    Simulated,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    pub credentials: Option<Credentials>,
    pub bbox: Option<BoundingBox>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            credentials: None,
            bbox: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Origin-country label whose flights are listed first.
    pub region: String,
    pub list_limit: usize,
    pub airborne_only: bool,
    /// Flight code prefixes allowed in the list; empty allows all.
    pub carriers: Vec<String>,
    /// Airport codes allowed as departure or arrival; empty allows all.
    pub airports: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            region: "India".to_string(),
            list_limit: 100,
            airborne_only: true,
            carriers: Vec::new(),
            airports: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, all-default config
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval.is_zero() {
            return Err(ConfigError::Invalid("refresh.interval must be positive".into()));
        }
        if self.display.list_limit == 0 {
            return Err(ConfigError::Invalid("display.list_limit must be positive".into()));
        }
        if let Some(bbox) = &self.provider.bbox {
            if bbox.south > bbox.north || bbox.west > bbox.east {
                return Err(ConfigError::Invalid(
                    "provider.bbox must have south <= north and west <= east".into(),
                ));
            }
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
