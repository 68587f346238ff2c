//! OS credential store lookups through the platform CLI.
//!
//! macOS uses `security`, other unix desktops use libsecret's `secret-tool`.

use crate::constants;
use crate::error::CredentialError;
use crate::models::credential::Credential;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgStyle {
    /// `security find-generic-password -a <account> -s <service> -w`
    Security,
    /// `secret-tool lookup service <service> account <account>`
    SecretTool,
}

#[derive(Debug, Clone)]
pub struct KeychainTool {
    program: PathBuf,
    style: ArgStyle,
}

impl KeychainTool {
    /// The tool native to this platform.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self {
                program: PathBuf::from(constants::MACOS_KEYCHAIN_PROGRAM),
                style: ArgStyle::Security,
            }
        } else {
            Self {
                program: PathBuf::from(constants::SECRET_TOOL_PROGRAM),
                style: ArgStyle::SecretTool,
            }
        }
    }

    /// A replacement program that understands the `security` arguments.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            style: ArgStyle::Security,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn lookup(&self, service: &str, username: &str) -> Result<Credential, CredentialError> {
        let mut cmd = Command::new(&self.program);
        match self.style {
            ArgStyle::Security => {
                cmd.arg("find-generic-password")
                    .arg("-a")
                    .arg(username)
                    .arg("-s")
                    .arg(service)
                    .arg("-w");
            }
            ArgStyle::SecretTool => {
                cmd.arg("lookup")
                    .arg("service")
                    .arg(service)
                    .arg("account")
                    .arg(username);
            }
        }

        debug!(program = %self.program.display(), service, username, "querying credential store");
        let output = cmd.output().map_err(|e| {
            let reason = if e.kind() == ErrorKind::NotFound {
                format!("{} not found on PATH", self.program.display())
            } else {
                format!("run {}: {}", self.program.display(), e)
            };
            CredentialError::CredentialStoreUnavailable(reason)
        })?;

        let not_found = || CredentialError::CredentialNotFound {
            service: service.to_string(),
            username: username.to_string(),
        };

        if !output.status.success() {
            return Err(self.classify_failure(&output).unwrap_or_else(not_found));
        }

        let stdout = Zeroizing::new(output.stdout);
        let secret = String::from_utf8(stdout.to_vec()).map_err(|_| {
            CredentialError::CredentialStoreUnavailable("credential store returned non-UTF-8 data".into())
        })?;
        Credential::new(secret).map_err(|_| not_found())
    }

    /// `None` means "no such item"; anything else is the store failing.
    fn classify_failure(&self, output: &Output) -> Option<CredentialError> {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let code = output.status.code();

        let missing = match self.style {
            ArgStyle::Security => {
                code == Some(constants::SECURITY_ITEM_NOT_FOUND_STATUS)
                    || stderr.contains("could not be found")
            }
            // secret-tool exits 1 silently when nothing matches.
            ArgStyle::SecretTool => code == Some(1) && stderr.is_empty(),
        };
        if missing {
            return None;
        }

        let detail = if stderr.is_empty() {
            match code {
                Some(c) => format!("{} exited with status {}", self.program.display(), c),
                None => format!("{} terminated by signal", self.program.display()),
            }
        } else {
            format!("{}: {}", self.program.display(), stderr)
        };
        Some(CredentialError::CredentialStoreUnavailable(detail))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("security");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_lookup_returns_trimmed_secret() {
        let dir = TempDir::new().unwrap();
        let tool = KeychainTool::with_program(fake_tool(
            &dir,
            "[ \"$1\" = find-generic-password ] && [ \"$3\" = alice ] && [ \"$5\" = maps ] && echo 'AIza-test'",
        ));
        let cred = tool.lookup("maps", "alice").unwrap();
        assert_eq!(cred.expose(), "AIza-test");
    }

    #[test]
    fn test_status_44_is_not_found() {
        let dir = TempDir::new().unwrap();
        let tool = KeychainTool::with_program(fake_tool(
            &dir,
            "echo 'security: SecKeychainSearchCopyNext: The specified item could not be found in the keychain.' >&2; exit 44",
        ));
        let err = tool.lookup("maps", "alice").unwrap_err();
        assert!(matches!(err, CredentialError::CredentialNotFound { .. }));
    }

    #[test]
    fn test_empty_output_is_not_found() {
        let dir = TempDir::new().unwrap();
        let tool = KeychainTool::with_program(fake_tool(&dir, "exit 0"));
        let err = tool.lookup("maps", "alice").unwrap_err();
        assert!(matches!(err, CredentialError::CredentialNotFound { .. }));
    }

    #[test]
    fn test_other_failure_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let tool = KeychainTool::with_program(fake_tool(
            &dir,
            "echo 'User interaction is not allowed.' >&2; exit 36",
        ));
        match tool.lookup("maps", "alice").unwrap_err() {
            CredentialError::CredentialStoreUnavailable(msg) => {
                assert!(msg.contains("User interaction is not allowed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let tool = KeychainTool::with_program("/nonexistent/route-report-security");
        let err = tool.lookup("maps", "alice").unwrap_err();
        assert!(matches!(err, CredentialError::CredentialStoreUnavailable(_)));
    }
}
