//! Resolution of the configuration file and Keeper session paths.

use crate::constants;
use crate::util::path::expand_home;
use std::env;
use std::path::{Path, PathBuf};

/// How the configuration path was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Flag,
    EnvVar,
    PlatformDefault,
}

#[derive(Debug, Clone)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub origin: ConfigOrigin,
}

impl ConfigPath {
    /// Resolve from CLI arg, env var, or the platform config directory.
    ///
    /// clap already folds `ROUTE_REPORT_CONFIG` into the flag; the env lookup
    /// here covers library callers.
    pub fn resolve(flag: Option<PathBuf>) -> Option<Self> {
        if let Some(path) = flag {
            return Some(Self {
                path: expand_home(&path),
                origin: ConfigOrigin::Flag,
            });
        }
        if let Some(path) = env::var_os(constants::CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Some(Self {
                path: expand_home(Path::new(&path)),
                origin: ConfigOrigin::EnvVar,
            });
        }
        dirs::config_dir().map(|dir| Self {
            path: dir
                .join(constants::CONFIG_DIR_NAME)
                .join(constants::CONFIG_FILE_NAME),
            origin: ConfigOrigin::PlatformDefault,
        })
    }
}

/// Keeper Commander session file, honouring a configured override.
pub fn keeper_session_path(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(path) => Some(expand_home(path)),
        None => dirs::home_dir().map(|home| home.join(constants::KEEPER_CONFIG_RELATIVE)),
    }
}
