use msutils_core::{Error, FileLogger, LogFormat, LogLevel, LogStream, LoggerConfig};
use pretty_assertions::assert_eq;
use tests::logger::TestLogger;

fn split_line(line: &str) -> (String, String, String) {
    let parts: Vec<&str> = line.splitn(3, " | ").collect();
    assert_eq!(parts.len(), 3, "malformed line: {}", line);
    (parts[0].to_string(), parts[1].to_string(), parts[2].to_string())
}

#[test]
fn info_line_lands_in_access_log() {
    let mut t = TestLogger::new();
    t.logger.add_to_log("info", "x").unwrap();

    let lines = t.lines(&t.access_path());
    assert_eq!(lines.len(), 1);
    let (timestamp, level, message) = split_line(&lines[0]);
    assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
    assert_eq!(level, "INFO");
    assert_eq!(message, "x");

    assert!(t.lines(&t.error_path()).is_empty());
}

#[test]
fn levels_are_routed_by_severity() {
    let mut t = TestLogger::new();
    for level in ["debug", "info", "warn", "warning", "error", "critical"] {
        t.logger.add_to_log(level, level).unwrap();
    }

    let access: Vec<String> = t
        .lines(&t.access_path())
        .iter()
        .map(|l| split_line(l).1)
        .collect();
    assert_eq!(access, vec!["DEBUG", "INFO"]);

    let errors: Vec<String> = t
        .lines(&t.error_path())
        .iter()
        .map(|l| split_line(l).1)
        .collect();
    assert_eq!(errors, vec!["WARNING", "WARNING", "ERROR", "CRITICAL"]);
}

#[test]
fn unknown_level_is_rejected_without_writing() {
    let mut t = TestLogger::new();
    let err = t.logger.add_to_log("verbose", "nope").unwrap_err();
    assert!(matches!(err, Error::InvalidLevel(ref level) if level == "verbose"));
    assert!(!t.access_path().exists());
    assert!(!t.error_path().exists());
}

#[test]
fn multiline_messages_stay_on_one_line() {
    let mut t = TestLogger::new();
    t.logger.error("first\nsecond").unwrap();

    let lines = t.lines(&t.error_path());
    assert_eq!(lines.len(), 1);

    let recent = t.logger.read_recent(LogStream::Error, 10, None).unwrap();
    assert_eq!(recent[0].message, "first\nsecond");
}

#[test]
fn unwritable_directory_fails_to_open() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();

    let result = FileLogger::open(LoggerConfig::with_dir(blocker.join("logs")));
    let err = result.err().expect("opening should fail");
    assert!(err.is_io());
}

#[test]
fn json_lines_can_be_read_back() {
    let mut t = TestLogger::with(|config| LoggerConfig {
        format: LogFormat::Json,
        ..config
    });
    t.logger.warning("disk at 91%").unwrap();
    t.logger.error("disk full").unwrap();

    for line in t.lines(&t.error_path()) {
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value["ts"].is_string());
    }

    let recent = t
        .logger
        .read_recent(LogStream::Error, 10, Some(LogLevel::Error))
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].message, "disk full");
}

#[test]
fn maintenance_reports_on_log_files() {
    let mut t = TestLogger::new();
    t.logger.info("hello").unwrap();

    let report = t.logger.check_permissions();
    assert!(report.directory_exists);
    assert!(report.directory_writable);
    assert!(report.files["access.log"].exists);
    assert!(!report.files["error.log"].exists);

    assert!(t.logger.fix_all_permissions().unwrap());

    let diagnosis = t.logger.diagnose();
    assert_eq!(diagnosis.write_test, "success");
    assert_eq!(diagnosis.effective_directory.as_deref(), Some(t.dir()));
}
