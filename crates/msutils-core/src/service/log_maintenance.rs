//! Housekeeping for log directories: age-based cleanup, permission reports
//! and repairs, diagnostics

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use super::log_directory::{self, ensure_directory, mode_string, set_mode};
use crate::domain::LoggerConfig;
use crate::error::{Error, IoContext, Result};

const LOG_FILE_PATTERN: &str = "*.log*";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Permission status of one log file
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileStatus {
    pub exists: bool,
    pub readable: bool,
    pub writable: bool,
    /// Octal permission bits, e.g. `"664"` (unix only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

/// Permission status of a log directory and its known files
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PermissionReport {
    pub log_directory: PathBuf,
    pub directory_exists: bool,
    pub directory_writable: bool,
    pub files: BTreeMap<String, FileStatus>,
}

/// Everything worth knowing when logs do not show up where expected
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub preferred_directory: PathBuf,
    /// `None` when no candidate directory is usable
    pub effective_directory: Option<PathBuf>,
    pub permission_status: PermissionReport,
    /// `"success"` or `"failed: <reason>"`
    pub write_test: String,
}

/// Log files (`*.log*`) directly inside `dir`
fn log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        LOG_FILE_PATTERN
    );
    let entries = glob::glob(&pattern).map_err(|_| Error::Config {
        key: "log_dir",
        value: dir.display().to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io {
            action: "list log directory",
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Delete log files whose last modification is older than `days_to_keep`
/// days. Returns how many were removed.
pub fn cleanup_old_logs(dir: &Path, days_to_keep: u32) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let max_age = Duration::from_secs(u64::from(days_to_keep) * SECONDS_PER_DAY);
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for path in log_files(dir)? {
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .io_context("inspect log file", &path)?;
        if modified >= cutoff {
            continue;
        }
        fs::remove_file(&path).io_context("remove old log file", &path)?;
        debug!("Removed old log file: {:?}", path);
        removed += 1;
    }

    if removed > 0 {
        info!("Cleaned up {} log file(s) older than {} days in {:?}", removed, days_to_keep, dir);
    }
    Ok(removed)
}

fn file_status(path: &Path) -> FileStatus {
    if !path.exists() {
        return FileStatus {
            exists: false,
            readable: false,
            writable: false,
            permissions: None,
        };
    }
    FileStatus {
        exists: true,
        readable: File::open(path).is_ok(),
        writable: OpenOptions::new().append(true).open(path).is_ok(),
        permissions: mode_string(path),
    }
}

/// Report on the directory and the named files inside it
pub fn check_permissions(dir: &Path, file_names: &[&str]) -> PermissionReport {
    let directory_exists = dir.is_dir();
    let files = if directory_exists {
        file_names
            .iter()
            .map(|name| (name.to_string(), file_status(&dir.join(name))))
            .collect()
    } else {
        BTreeMap::new()
    };

    PermissionReport {
        log_directory: dir.to_path_buf(),
        directory_exists,
        directory_writable: directory_exists && log_directory::probe_writable(dir).is_ok(),
        files,
    }
}

/// Reapply `dir_mode` to the directory and `file_mode` to every log file.
///
/// A missing directory is created. Returns false when any entry could not be
/// fixed.
pub fn fix_all_permissions(dir: &Path, dir_mode: u32, file_mode: u32) -> Result<bool> {
    if !dir.exists() {
        ensure_directory(dir, dir_mode)?;
        return Ok(true);
    }

    if let Err(e) = set_mode(dir, dir_mode) {
        warn!("Could not fix directory permissions on {:?}: {}", dir, e);
        return Ok(false);
    }

    let mut all_fixed = true;
    for path in log_files(dir)? {
        if let Err(e) = set_mode(&path, file_mode) {
            warn!("Could not fix permissions for {:?}: {}", path, e);
            all_fixed = false;
        }
    }
    Ok(all_fixed)
}

/// Resolve the effective directory and check what can be done there
pub fn diagnose(config: &LoggerConfig) -> Diagnosis {
    let effective = log_directory::effective_log_directory(config);
    let write_test = match &effective {
        Ok(_) => "success".to_string(),
        Err(e) => format!("failed: {}", e),
    };
    let effective_directory = effective.ok();
    let report_dir = effective_directory
        .clone()
        .unwrap_or_else(|| config.log_dir.clone());

    Diagnosis {
        preferred_directory: config.log_dir.clone(),
        effective_directory,
        permission_status: check_permissions(
            &report_dir,
            &[config.access_file.as_str(), config.error_file.as_str()],
        ),
        write_test,
    }
}
