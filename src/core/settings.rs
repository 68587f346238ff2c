use crate::models::report_config::ReportConfig;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Load the configuration file. A missing file means defaults.
pub fn load(path: &Path) -> Result<ReportConfig> {
    if !path.exists() {
        return Ok(ReportConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read configuration {}", path.display()))?;
    let config: ReportConfig = toml::from_str(&content)
        .with_context(|| format!("parse configuration {}", path.display()))?;
    validate(&config).with_context(|| format!("validate configuration {}", path.display()))?;
    Ok(config)
}

fn validate(config: &ReportConfig) -> Result<()> {
    if let Some(rate) = config.cost.per_km {
        if !rate.is_finite() || rate < 0.0 {
            bail!("cost.per_km must be a non-negative number, got {}", rate);
        }
    }
    if config.cost.currency.trim().is_empty() {
        bail!("cost.currency cannot be empty");
    }
    if config.directions.mode.trim().is_empty() {
        bail!("directions.mode cannot be empty");
    }
    if config.static_map.scale == 0 {
        bail!("static_map.scale must be at least 1");
    }
    Ok(())
}
