//! Argument parsing, validation, and configuration loading.

use crate::core::paths::{ConfigOrigin, ConfigPath};
use crate::core::settings;
use crate::error::ReportError;
use crate::models::credential::CredentialSource;
use crate::models::report_config::ReportConfig;
use crate::util::logging;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod report;

/// Shared context passed to the report pipeline.
pub struct CliContext {
    pub config: ReportConfig,
    pub config_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(
    name = "route-report",
    version,
    about = "Render a route's distance, travel time and estimated cost into a PDF"
)]
pub struct Cli {
    /// Account name of the API key entry in the OS credential store
    #[arg(long, value_name = "ACCOUNT")]
    pub username: Option<String>,

    /// Service name of the API key entry in the OS credential store
    #[arg(long = "keychain_service", visible_alias = "keychain-service", value_name = "SERVICE")]
    pub keychain_service: Option<String>,

    /// Keeper record UID holding the API key (uses the cached Keeper session)
    #[arg(long, value_name = "UID")]
    pub keeper_uid: Option<String>,

    /// Start address, place name, or "lat,lng"
    #[arg(long)]
    pub origin: String,

    /// End address, place name, or "lat,lng"
    #[arg(long)]
    pub destination: String,

    /// PDF file to write (replaced if it exists)
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Embed a static map of the route below the summary
    #[arg(long)]
    pub map: bool,

    /// Estimate cost from distance at this rate when the API returns no fare
    #[arg(long, value_name = "RATE")]
    pub cost_per_km: Option<f64>,

    /// Currency code for the per-kilometre estimate
    #[arg(long, value_name = "CODE")]
    pub currency: Option<String>,

    /// Configuration file
    #[arg(long, value_name = "PATH", env = "ROUTE_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub source: CredentialSource,
    pub origin: String,
    pub destination: String,
    pub output: PathBuf,
}

impl Cli {
    /// Validate, load configuration, then run the pipeline.
    /// Returns the written PDF path.
    pub fn run(self) -> Result<PathBuf, ReportError> {
        logging::init(self.verbose, self.quiet);

        let request = self.validate()?;
        let ctx = self.load_context()?;
        report::run(&ctx, &request)
    }

    /// Check flags without touching any secret store or network.
    pub fn validate(&self) -> Result<ReportRequest, ReportError> {
        let source = self.credential_source()?;
        let origin = required_text("--origin", &self.origin)?;
        let destination = required_text("--destination", &self.destination)?;
        if self.output.as_os_str().is_empty() {
            return Err(ReportError::Argument("--output cannot be empty".into()));
        }
        if let Some(rate) = self.cost_per_km {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ReportError::Argument(format!(
                    "--cost-per-km must be a non-negative number, got {}",
                    rate
                )));
            }
        }
        if let Some(currency) = &self.currency {
            required_text("--currency", currency)?;
        }
        Ok(ReportRequest {
            source,
            origin,
            destination,
            output: self.output.clone(),
        })
    }

    /// Exactly one of the two credential sources must be selected.
    pub fn credential_source(&self) -> Result<CredentialSource, ReportError> {
        let keychain_requested = self.username.is_some() || self.keychain_service.is_some();
        match (keychain_requested, &self.keeper_uid) {
            (true, Some(_)) => Err(ReportError::Argument(
                "--keeper-uid cannot be combined with --username/--keychain_service".into(),
            )),
            (false, None) => Err(ReportError::Argument(
                "choose a secret source: --username with --keychain_service, or --keeper-uid".into(),
            )),
            (false, Some(uid)) => Ok(CredentialSource::Vault {
                record_uid: required_text("--keeper-uid", uid)?,
            }),
            (true, None) => match (&self.username, &self.keychain_service) {
                (Some(username), Some(service)) => Ok(CredentialSource::Keychain {
                    username: required_text("--username", username)?,
                    service: required_text("--keychain_service", service)?,
                }),
                (None, _) => Err(ReportError::Argument(
                    "--keychain_service requires --username".into(),
                )),
                (_, None) => Err(ReportError::Argument(
                    "--username requires --keychain_service".into(),
                )),
            },
        }
    }

    fn load_context(&self) -> Result<CliContext, ReportError> {
        let resolved = ConfigPath::resolve(self.config.clone());
        let mut config = match &resolved {
            Some(cp) => {
                if cp.origin != ConfigOrigin::PlatformDefault && !cp.path.exists() {
                    return Err(ReportError::Config(format!(
                        "{} not found",
                        cp.path.display()
                    )));
                }
                debug!(path = %cp.path.display(), origin = ?cp.origin, "loading configuration");
                settings::load(&cp.path).map_err(|e| ReportError::Config(format!("{:#}", e)))?
            }
            None => {
                warn!("no configuration directory on this platform; using defaults");
                ReportConfig::default()
            }
        };

        // Flags override the file.
        if self.map {
            config.static_map.enabled = true;
        }
        if let Some(rate) = self.cost_per_km {
            config.cost.per_km = Some(rate);
        }
        if let Some(currency) = &self.currency {
            config.cost.currency = currency.trim().to_string();
        }

        Ok(CliContext {
            config,
            config_path: resolved.map(|cp| cp.path),
        })
    }
}

fn required_text(flag: &str, value: &str) -> Result<String, ReportError> {
    if value.trim().is_empty() {
        return Err(ReportError::Argument(format!("{} cannot be empty", flag)));
    }
    Ok(value.to_string())
}
