//! Keeper vault lookups through Keeper Commander.
//!
//! The cached session (`~/.keeper/config.json`) is only read here, never
//! written. Commander is invoked in batch mode so it never prompts; a dead
//! session surfaces as [`CredentialError::SessionExpired`].

use crate::error::CredentialError;
use crate::models::credential::Credential;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// The subset of Commander's config file that marks a usable session.
#[derive(Debug, Clone, Deserialize)]
pub struct KeeperSession {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    session_token: Option<String>,
    #[serde(default)]
    device_token: Option<String>,
    #[serde(default)]
    clone_code: Option<String>,
}

impl KeeperSession {
    fn has_token(&self) -> bool {
        [&self.session_token, &self.device_token, &self.clone_code]
            .iter()
            .any(|t| t.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Read and check the cached session at `path`.
pub fn load_session(path: &Path) -> Result<KeeperSession, CredentialError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Zeroizing::new(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CredentialError::SessionExpired(format!(
                "no session file at {}",
                path.display()
            )))
        }
        Err(e) => {
            return Err(CredentialError::SessionExpired(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };
    let session: KeeperSession = serde_json::from_str(&raw).map_err(|e| {
        CredentialError::SessionExpired(format!("cannot parse {}: {}", path.display(), e))
    })?;

    if session.user.as_deref().map_or(true, |u| u.trim().is_empty()) {
        return Err(CredentialError::SessionExpired(format!(
            "{} has no logged-in user",
            path.display()
        )));
    }
    if !session.has_token() {
        return Err(CredentialError::SessionExpired(format!(
            "{} holds no session or device token",
            path.display()
        )));
    }
    Ok(session)
}

/// Runs `keeper get` against a pre-authenticated session file.
#[derive(Debug, Clone)]
pub struct KeeperClient {
    program: PathBuf,
    config_path: PathBuf,
}

impl KeeperClient {
    pub fn new(program: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config_path: config_path.into(),
        }
    }

    pub fn fetch_password(&self, record_uid: &str) -> Result<Credential, CredentialError> {
        let session = load_session(&self.config_path)?;
        info!(
            user = session.user.as_deref().unwrap_or_default(),
            server = session.server.as_deref().unwrap_or("default"),
            record_uid,
            "looking up Keeper record"
        );

        let output = Command::new(&self.program)
            .arg("--config")
            .arg(&self.config_path)
            .arg("--batch-mode")
            .arg("get")
            .arg(record_uid)
            .arg("--format")
            .arg("json")
            .output()
            .map_err(|e| {
                let reason = if e.kind() == ErrorKind::NotFound {
                    format!("{} not found on PATH", self.program.display())
                } else {
                    format!("run {}: {}", self.program.display(), e)
                };
                CredentialError::VaultUnavailable(reason)
            })?;

        let stdout = Zeroizing::new(String::from_utf8_lossy(&output.stdout).into_owned());
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            debug!(status = ?output.status.code(), "keeper get failed");
            return Err(classify_failure(record_uid, &stderr, stdout.len()));
        }
        // stdout may hold the record, so only stderr ever reaches an error message.
        let record = match parse_record(&stdout) {
            Some(record) => record,
            None => {
                debug!(bytes = stdout.len(), "keeper get output is not JSON");
                return Err(classify_failure(record_uid, &stderr, stdout.len()));
            }
        };

        let password = Zeroizing::new(extract_password(&record).ok_or_else(|| {
            CredentialError::RecordNotFound(format!("{} (record has no password field)", record_uid))
        })?);
        Credential::new(password.to_string()).map_err(|_| {
            CredentialError::RecordNotFound(format!("{} (password field is empty)", record_uid))
        })
    }
}

/// Commander sometimes prints status lines around the JSON record.
fn parse_record(stdout: &str) -> Option<Value> {
    let trimmed = stdout.trim();
    if let Ok(record) = serde_json::from_str::<Value>(trimmed) {
        return Some(record);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

/// Classify a failed `keeper get` from its stderr. Session markers win over
/// "not found", which Commander also uses for a missing config file.
fn classify_failure(record_uid: &str, stderr: &str, stdout_len: usize) -> CredentialError {
    let shown: String = stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect();
    let lower = stderr.to_lowercase();
    if lower.contains("session")
        || lower.contains("expired")
        || lower.contains("login")
        || lower.contains("not logged in")
        || lower.contains("authenticat")
    {
        return CredentialError::SessionExpired(shown);
    }
    if lower.contains("not found")
        || lower.contains("cannot be found")
        || lower.contains("no such record")
        || lower.contains("cannot find")
    {
        return CredentialError::RecordNotFound(record_uid.to_string());
    }
    if shown.is_empty() {
        return CredentialError::VaultUnavailable(format!(
            "keeper returned no usable output ({} bytes on stdout)",
            stdout_len
        ));
    }
    CredentialError::VaultUnavailable(shown)
}

/// Legacy records carry a top-level `password`; typed (v3) records keep it in
/// `fields` (or `custom`) as `{"type": "password", "value": ["..."]}`.
fn extract_password(record: &Value) -> Option<String> {
    if let Some(pw) = record.get("password").and_then(Value::as_str) {
        return Some(pw.to_string());
    }
    ["fields", "custom"].iter().find_map(|section| {
        record
            .get(*section)
            .and_then(Value::as_array)?
            .iter()
            .filter(|f| f.get("type").and_then(Value::as_str) == Some("password"))
            .find_map(|f| match f.get("value") {
                Some(Value::Array(values)) => values.first().and_then(Value::as_str).map(String::from),
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            })
    })
}
