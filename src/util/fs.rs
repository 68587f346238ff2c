use crate::util::path::parent_dir;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Write `data` to `path` through a temp file in the same directory, so the
/// target either holds the complete new content or is left untouched.
pub fn write_atomic(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    if path.is_dir() {
        bail!("is a directory");
    }
    let dir = parent_dir(path);
    if !dir.is_dir() {
        bail!("directory {} does not exist", dir.display());
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(".route-report-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(data).context("write temp file")?;
    tmp.as_file().sync_all().context("sync temp file")?;

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        tmp.as_file()
            .set_permissions(perm)
            .with_context(|| format!("set permissions {:o} on temp file", mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path)
        .map_err(|err| anyhow::anyhow!("replace {}: {}", path.display(), err.error))?;
    Ok(())
}
