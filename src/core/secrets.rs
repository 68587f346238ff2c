//! Secret resolution: one credential source per invocation.

use crate::core::keeper::KeeperClient;
use crate::core::paths;
use crate::error::CredentialError;
use crate::models::credential::{Credential, CredentialSource};
use crate::models::report_config::ReportConfig;
use crate::util::keychain::KeychainTool;
use tracing::info;

impl CredentialSource {
    /// Fetch the API key from the selected backend.
    pub fn resolve(&self, config: &ReportConfig) -> Result<Credential, CredentialError> {
        match self {
            CredentialSource::Keychain { username, service } => {
                let tool = match &config.keychain.program {
                    Some(program) => KeychainTool::with_program(program),
                    None => KeychainTool::platform_default(),
                };
                info!(service = %service, username = %username, program = %tool.program().display(), "resolving API key from OS credential store");
                tool.lookup(service, username)
            }
            CredentialSource::Vault { record_uid } => {
                let session = paths::keeper_session_path(config.keeper.config_path.as_deref())
                    .ok_or_else(|| {
                        CredentialError::SessionExpired(
                            "cannot locate the Keeper session file (no home directory)".into(),
                        )
                    })?;
                info!(record_uid = %record_uid, session = %session.display(), "resolving API key from Keeper");
                KeeperClient::new(&config.keeper.program, session).fetch_password(record_uid)
            }
        }
    }
}
