//! Configuration file model.

use crate::constants;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub directions: DirectionsSection,
    #[serde(default)]
    pub static_map: StaticMapSection,
    #[serde(default)]
    pub cost: CostSection,
    #[serde(default)]
    pub keychain: KeychainSection,
    #[serde(default)]
    pub keeper: KeeperSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionsSection {
    #[serde(default = "default_directions_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout; unset keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for DirectionsSection {
    fn default() -> Self {
        Self {
            endpoint: default_directions_endpoint(),
            mode: default_mode(),
            units: default_units(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticMapSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_static_map_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_map_size")]
    pub size: String,
    #[serde(default = "default_map_scale")]
    pub scale: u8,
    #[serde(default = "default_map_type")]
    pub maptype: String,
}

impl Default for StaticMapSection {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_static_map_endpoint(),
            size: default_map_size(),
            scale: default_map_scale(),
            maptype: default_map_type(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostSection {
    /// Rate applied to the route distance when the API returns no fare.
    #[serde(default)]
    pub per_km: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for CostSection {
    fn default() -> Self {
        Self {
            per_km: None,
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeychainSection {
    /// Overrides the platform tool; invoked with `security` arguments.
    #[serde(default)]
    pub program: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeeperSection {
    #[serde(default = "default_keeper_program")]
    pub program: PathBuf,
    /// Commander session file; defaults to `~/.keeper/config.json`.
    #[serde(default)]
    pub config_path: Option<PathBuf>,
}

impl Default for KeeperSection {
    fn default() -> Self {
        Self {
            program: default_keeper_program(),
            config_path: None,
        }
    }
}

fn default_directions_endpoint() -> String {
    constants::DEFAULT_DIRECTIONS_ENDPOINT.to_string()
}

fn default_mode() -> String {
    constants::DEFAULT_TRAVEL_MODE.to_string()
}

fn default_units() -> String {
    constants::DEFAULT_UNITS.to_string()
}

fn default_static_map_endpoint() -> String {
    constants::DEFAULT_STATIC_MAP_ENDPOINT.to_string()
}

fn default_map_size() -> String {
    constants::DEFAULT_MAP_SIZE.to_string()
}

fn default_map_scale() -> u8 {
    constants::DEFAULT_MAP_SCALE
}

fn default_map_type() -> String {
    constants::DEFAULT_MAP_TYPE.to_string()
}

fn default_currency() -> String {
    constants::DEFAULT_CURRENCY.to_string()
}

fn default_keeper_program() -> PathBuf {
    PathBuf::from(constants::DEFAULT_KEEPER_PROGRAM)
}
