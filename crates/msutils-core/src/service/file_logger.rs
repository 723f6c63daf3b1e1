//! File logger - appends records to rotating access and error logs

use chrono::{DateTime, Local, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::log_directory::{self, alternative_file_path, create_directory, fix_permissions};
use super::log_maintenance::{self, Diagnosis, PermissionReport};
use crate::domain::{LogLevel, LogRecord, LogStream, LoggerConfig, RotationPolicy};
use crate::error::{IoContext, Result};

/// Appends log records to per-stream files inside one directory.
///
/// debug and info records go to the access file, warn and above to the error
/// file. Writes are synchronous and unbuffered; every failure is returned to
/// the caller. The logger does no locking of its own, so callers that share
/// it between threads must wrap it (e.g. in a `Mutex`).
pub struct FileLogger {
    config: LoggerConfig,
    directory: PathBuf,
    writers: HashMap<PathBuf, LogWriter>,
}

impl FileLogger {
    /// Resolve and create the log directory, failing if it cannot be written
    pub fn open(config: LoggerConfig) -> Result<Self> {
        let directory = log_directory::effective_log_directory(&config)?;
        info!("[Logger] Writing logs to {:?}", directory);
        Ok(Self {
            config,
            directory,
            writers: HashMap::new(),
        })
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Directory the logger writes to (may be a fallback)
    pub fn log_directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the active file for a stream
    pub fn log_file(&self, stream: LogStream) -> PathBuf {
        let configured = self.configured_path(stream);
        match self.writers.get(&configured) {
            Some(writer) => writer.path.clone(),
            None => configured,
        }
    }

    fn configured_path(&self, stream: LogStream) -> PathBuf {
        self.directory.join(self.config.file_name(stream))
    }

    /// Append a message with a level given by name (`debug`, `info`, `warn`,
    /// `warning`, `error`, `critical`)
    pub fn add_to_log(&mut self, level: &str, message: &str) -> Result<()> {
        let level = LogLevel::parse(level)?;
        self.log(level, message)
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        let record = LogRecord::new(level, message);
        self.write_record(&record)
    }

    /// Append an already built record; its timestamp drives daily rotation
    pub fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        let line = record.format_line(self.config.format)?;
        let path = self.configured_path(record.level.stream());

        let config = &self.config;
        let writer = self
            .writers
            .entry(path)
            .or_insert_with_key(|path| LogWriter::new(path.clone(), config));
        writer.write_line(&line, record.timestamp)
    }

    pub fn debug(&mut self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    pub fn critical(&mut self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Critical, message)
    }

    /// Read the most recent records of a stream, oldest first
    pub fn read_recent(
        &self,
        stream: LogStream,
        limit: usize,
        min_level: Option<LogLevel>,
    ) -> Result<Vec<LogRecord>> {
        let path = self.log_file(stream);
        if !path.exists() {
            return Ok(vec![]);
        }

        let content = fs::read_to_string(&path).io_context("read log file", &path)?;
        let mut records: Vec<LogRecord> = content
            .lines()
            .rev()
            .filter_map(|line| {
                let parsed = LogRecord::parse_line(line, self.config.format);
                if parsed.is_none() {
                    debug!("Skipping unparsable log line in {:?}", path);
                }
                parsed
            })
            .filter(|record| min_level.map_or(true, |lvl| record.level >= lvl))
            .take(limit)
            .collect();

        records.reverse();
        Ok(records)
    }

    /// Delete `*.log*` files older than `days_to_keep` days
    pub fn cleanup_old_logs(&self, days_to_keep: u32) -> Result<usize> {
        log_maintenance::cleanup_old_logs(&self.directory, days_to_keep)
    }

    /// Permission status of the directory and both stream files
    pub fn check_permissions(&self) -> PermissionReport {
        let mut names = vec![self.config.access_file.as_str()];
        if self.config.error_file != self.config.access_file {
            names.push(self.config.error_file.as_str());
        }
        log_maintenance::check_permissions(&self.directory, &names)
    }

    /// Reapply the configured modes to the directory and every log file
    pub fn fix_all_permissions(&self) -> Result<bool> {
        log_maintenance::fix_all_permissions(
            &self.directory,
            self.config.dir_mode,
            self.config.file_mode,
        )
    }

    pub fn diagnose(&self) -> Diagnosis {
        log_maintenance::diagnose(&self.config)
    }
}

/// Whether the active file must be archived before the next write
fn rotation_due(
    policy: RotationPolicy,
    current_size: u64,
    incoming: u64,
    period: NaiveDate,
    today: NaiveDate,
) -> bool {
    if current_size == 0 {
        return false;
    }
    match policy {
        RotationPolicy::Size { max_bytes } => current_size + incoming > max_bytes,
        RotationPolicy::Daily => period != today,
        RotationPolicy::Never => false,
    }
}

/// Writer for a single log file
struct LogWriter {
    /// Active file; differs from the configured path after a fallback
    path: PathBuf,
    file: Option<File>,
    current_size: u64,
    /// Day the active file's last record belongs to
    period: NaiveDate,
    rotation: RotationPolicy,
    max_files: usize,
    compress: bool,
    file_mode: u32,
    dir_mode: u32,
    fallbacks: bool,
}

impl LogWriter {
    fn new(path: PathBuf, config: &LoggerConfig) -> Self {
        Self {
            path,
            file: None,
            current_size: 0,
            period: Local::now().date_naive(),
            rotation: config.rotation,
            max_files: config.max_files,
            compress: config.compress,
            file_mode: config.file_mode,
            dir_mode: config.dir_mode,
            fallbacks: config.fallbacks,
        }
    }

    fn write_line(&mut self, line: &str, at: DateTime<Local>) -> Result<()> {
        let today = at.date_naive();
        let incoming = line.len() as u64 + 1;

        // Reopen when the file was removed or moved away underneath us
        if !self.path.exists() {
            self.file = None;
        }
        let mut file = match self.file.take() {
            Some(file) => file,
            None => self.open_file()?,
        };

        if rotation_due(self.rotation, self.current_size, incoming, self.period, today) {
            drop(file);
            self.rotate()?;
            file = self.open_file()?;
        }

        let path = self.path.clone();
        let file = self.file.insert(file);

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
            .io_context("append to log file", &path)?;
        file.flush().io_context("flush log file", &path)?;

        self.current_size += incoming;
        self.period = today;
        Ok(())
    }

    fn open_file(&mut self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            create_directory(parent, self.dir_mode)?;
        }

        let file = match open_append(&self.path, self.file_mode) {
            Err(e) if self.fallbacks && e.kind() == std::io::ErrorKind::PermissionDenied => {
                let alternative = alternative_file_path(&self.path);
                warn!(
                    "Permission denied on {:?}, logging to {:?} instead",
                    self.path, alternative
                );
                self.path = alternative;
                open_append(&self.path, self.file_mode)
            }
            other => other,
        }
        .io_context("open log file", &self.path)?;

        let metadata = file.metadata().io_context("inspect log file", &self.path)?;
        self.current_size = metadata.len();
        if self.current_size > 0 {
            if let Ok(modified) = metadata.modified() {
                self.period = DateTime::<Local>::from(modified).date_naive();
            }
        }
        Ok(file)
    }

    fn rotate(&mut self) -> Result<()> {
        info!("Rotating log file {:?}", self.path);

        // Close the active file before moving it
        self.file = None;

        if self.max_files == 0 {
            fs::remove_file(&self.path).io_context("remove log file", &self.path)?;
            self.current_size = 0;
            return Ok(());
        }

        let archived = match self.rotation {
            RotationPolicy::Daily => {
                let date = self.period.format("%Y-%m-%d").to_string();
                let target = unique_path(&suffixed(&self.path, &date));
                fs::rename(&self.path, &target).io_context("archive log file", &self.path)?;
                target
            }
            _ => {
                self.shift_numbered_archives()?;
                let target = suffixed(&self.path, "1");
                fs::rename(&self.path, &target).io_context("archive log file", &self.path)?;
                target
            }
        };

        self.current_size = 0;

        if self.compress {
            compress_log_file(&archived)?;
        }

        if matches!(self.rotation, RotationPolicy::Daily) {
            self.prune_dated_archives()?;
        }
        Ok(())
    }

    /// `access.log.1` -> `access.log.2` and so on, dropping the archive that
    /// would exceed `max_files`
    fn shift_numbered_archives(&self) -> Result<()> {
        if let Some(oldest) = existing_archive(&self.path, self.max_files) {
            fs::remove_file(&oldest).io_context("remove old log file", &oldest)?;
            debug!("Removed old log file: {:?}", oldest);
        }
        for index in (1..self.max_files).rev() {
            if let Some(from) = existing_archive(&self.path, index) {
                let gz = from.extension().is_some_and(|ext| ext == "gz");
                let next = (index + 1).to_string();
                let to = if gz {
                    suffixed(&self.path, &format!("{}.gz", next))
                } else {
                    suffixed(&self.path, &next)
                };
                fs::rename(&from, &to).io_context("shift log file", &from)?;
            }
        }
        Ok(())
    }

    /// Keep only the newest `max_files` dated archives
    fn prune_dated_archives(&self) -> Result<()> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        let Some(name) = self.path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Ok(());
        };
        let prefix = format!("{}.", name);

        let mut archives = Vec::new();
        for entry in fs::read_dir(dir).io_context("list log directory", dir)? {
            let entry = entry.io_context("list log directory", dir)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let is_dated = file_name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.get(..10))
                .is_some_and(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
            if is_dated {
                archives.push(entry.path());
            }
        }

        // ISO dates sort chronologically
        archives.sort();
        if archives.len() > self.max_files {
            let to_remove = archives.len() - self.max_files;
            for path in archives.iter().take(to_remove) {
                fs::remove_file(path).io_context("remove old log file", path)?;
                debug!("Removed old log file: {:?}", path);
            }
        }
        Ok(())
    }
}

fn open_append(path: &Path, mode: u32) -> std::io::Result<File> {
    let existed = path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if !existed {
        fix_permissions(path, mode);
    }
    Ok(file)
}

/// `dir/access.log` + `1` -> `dir/access.log.1`
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn existing_archive(path: &Path, index: usize) -> Option<PathBuf> {
    let plain = suffixed(path, &index.to_string());
    if plain.exists() {
        return Some(plain);
    }
    let gz = suffixed(path, &format!("{}.gz", index));
    gz.exists().then_some(gz)
}

/// `path`, or `path.1`, `path.2`... when taken (also checking `.gz` twins)
fn unique_path(path: &Path) -> PathBuf {
    let taken = |p: &Path| p.exists() || suffixed(p, "gz").exists();
    if !taken(path) {
        return path.to_path_buf();
    }
    let mut index = 1;
    loop {
        let candidate = suffixed(path, &index.to_string());
        if !taken(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// Compress a log file using gzip, replacing the original
fn compress_log_file(path: &Path) -> Result<()> {
    let gz_path = suffixed(path, "gz");

    let content = fs::read(path).io_context("read log file", path)?;
    let file = File::create(&gz_path).io_context("create compressed log", &gz_path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(&content)
        .io_context("compress log file", &gz_path)?;
    encoder.finish().io_context("compress log file", &gz_path)?;

    fs::remove_file(path).io_context("remove log file", path)?;

    info!("Compressed log file: {:?} -> {:?}", path, gz_path);
    Ok(())
}
