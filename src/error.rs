//! Error taxonomy for each pipeline stage.
//!
//! Every error is terminal for the invocation. The CLI turns a
//! [`ReportError`] into a one-line message and an exit code.

use crate::constants;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no credential for service '{service}' and account '{username}' in the OS credential store")]
    CredentialNotFound { service: String, username: String },

    #[error("OS credential store unavailable: {0}")]
    CredentialStoreUnavailable(String),

    #[error("Keeper session expired or missing ({0})")]
    SessionExpired(String),

    #[error("Keeper record '{0}' not found")]
    RecordNotFound(String),

    #[error("Keeper vault unavailable: {0}")]
    VaultUnavailable(String),

    #[error("secret store returned an empty credential")]
    Empty,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("cannot geocode {0}")]
    InvalidLocation(String),

    #[error("no route found between origin and destination")]
    NoRouteFound,

    #[error("API key rejected: {0}")]
    ApiAuthError(String),

    #[error("mapping API unavailable: {0}")]
    ApiUnavailable(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot write {}: {reason}", path.display())]
    OutputPathUnwritable { path: PathBuf, reason: String },

    #[error("cannot build PDF document: {0}")]
    Serialize(String),
}

/// Top-level error returned by the CLI driver.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("arguments: {0}")]
    Argument(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error("credential: {0}")]
    Credential(#[from] CredentialError),

    #[error("route: {0}")]
    Route(#[from] RouteError),

    #[error("render: {0}")]
    Render(#[from] RenderError),
}

impl ReportError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReportError::Argument(_) | ReportError::Config(_) => constants::EXIT_ARGUMENT,
            ReportError::Credential(_) => constants::EXIT_CREDENTIAL,
            ReportError::Route(_) => constants::EXIT_ROUTE,
            ReportError::Render(_) => constants::EXIT_RENDER,
        }
    }

    /// Follow-up advice printed after the error line, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ReportError::Route(RouteError::ApiAuthError(_)) => {
                Some("check that the key stored in the selected secret source is valid and enabled for the Directions API")
            }
            ReportError::Credential(CredentialError::SessionExpired(_)) => {
                Some("run `keeper login` interactively to refresh the session, then retry")
            }
            _ => None,
        }
    }
}
