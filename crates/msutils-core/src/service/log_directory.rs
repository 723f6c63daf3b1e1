//! Log directory resolution and permission handling

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::LoggerConfig;
use crate::error::{IoContext, Result};

const WRITE_PROBE: &str = ".write_test";

/// Apply permission bits to a path. No-op on non-unix targets.
pub(crate) fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
        Ok(())
    }
}

/// Like [`set_mode`], but only warns on failure. A log file with the wrong
/// mode is still usable.
pub(crate) fn fix_permissions(path: &Path, mode: u32) -> bool {
    match set_mode(path, mode) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not set permissions {:o} on {:?}: {}", mode, path, e);
            false
        }
    }
}

/// Octal permission bits of a path, e.g. `"664"`
pub(crate) fn mode_string(path: &Path) -> Option<String> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path)
            .ok()
            .map(|m| format!("{:o}", m.permissions().mode() & 0o777))
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

/// Create `dir` (and parents) if missing. Only directories created here get
/// `dir_mode`; existing ones keep their permissions.
pub(crate) fn create_directory(dir: &Path, dir_mode: u32) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).io_context("create log directory", dir)?;
    fix_permissions(dir, dir_mode);
    debug!("Created log directory {:?}", dir);
    Ok(())
}

/// Write and remove a probe file to prove the directory accepts writes
pub(crate) fn probe_writable(dir: &Path) -> Result<()> {
    let probe = dir.join(WRITE_PROBE);
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&probe)
        .io_context("write to log directory", dir)?;
    file.write_all(b"test").io_context("write to log directory", dir)?;
    drop(file);
    fs::remove_file(&probe).io_context("remove write probe in", dir)?;
    Ok(())
}

/// Create the directory and check it can be written to
pub(crate) fn ensure_directory(dir: &Path, dir_mode: u32) -> Result<()> {
    create_directory(dir, dir_mode)?;
    probe_writable(dir)
}

/// Directories tried in order: the configured one, then (with fallbacks
/// enabled) `~/.{app}/logs`, `{tmp}/{app}_logs` and `./logs`
pub fn candidate_directories(config: &LoggerConfig) -> Vec<PathBuf> {
    let mut candidates = vec![config.log_dir.clone()];
    if config.fallbacks {
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(format!(".{}", config.app_name)).join("logs"));
        }
        candidates.push(std::env::temp_dir().join(format!("{}_logs", config.app_name)));
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join("logs"));
        }
    }
    candidates.dedup();
    candidates
}

/// The directory logs will actually go to.
///
/// Fails with the configured directory's error when no candidate is usable.
pub fn effective_log_directory(config: &LoggerConfig) -> Result<PathBuf> {
    let mut first_error = None;
    for dir in candidate_directories(config) {
        match ensure_directory(&dir, config.dir_mode) {
            Ok(()) => {
                if dir != config.log_dir {
                    warn!(
                        "Log directory {:?} is unusable, falling back to {:?}",
                        config.log_dir, dir
                    );
                }
                return Ok(dir);
            }
            Err(e) => {
                debug!("Cannot use log directory {:?}: {}", dir, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(config.log_dir.clone()),
    }
}

/// Sibling file name used when the configured file cannot be opened,
/// e.g. `access_1a2b3c4d.log`
pub(crate) fn alternative_file_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, &suffix[..8], ext.to_string_lossy()),
        None => format!("{}_{}", stem, &suffix[..8]),
    };
    path.with_file_name(name)
}
