use chrono::NaiveDate;
use filetime::{set_file_mtime, FileTime};
use msutils_core::{LogLevel, LoggerConfig, RotationPolicy};
use pretty_assertions::assert_eq;
use std::time::{Duration, SystemTime};
use tests::logger::{record_on, TestLogger};

fn size_limited(max_bytes: u64, max_files: usize) -> TestLogger {
    TestLogger::with(|config| LoggerConfig {
        rotation: RotationPolicy::Size { max_bytes },
        max_files,
        ..config
    })
}

#[test]
fn file_rotates_once_the_threshold_would_be_crossed() {
    let mut t = size_limited(100, 3);
    // "YYYY-MM-DD HH:MM:SS | INFO | " is 29 bytes, plus 20 + newline = 50
    let message = "a".repeat(20);

    t.logger.info(message.as_str()).unwrap();
    t.logger.info(message.as_str()).unwrap();
    assert_eq!(t.file_names(), vec!["access.log"]);
    assert_eq!(std::fs::metadata(t.access_path()).unwrap().len(), 100);

    t.logger.info(message.as_str()).unwrap();
    assert_eq!(t.file_names(), vec!["access.log", "access.log.1"]);
    assert_eq!(t.lines(&t.access_path()).len(), 1);
    assert_eq!(t.lines(&t.dir().join("access.log.1")).len(), 2);
}

#[test]
fn archive_count_is_bounded() {
    let mut t = size_limited(60, 2);
    for i in 0..10 {
        t.logger.error(format!("message number {:02}", i)).unwrap();
    }

    assert_eq!(t.file_names(), vec!["error.log", "error.log.1", "error.log.2"]);
    let newest = t.lines(&t.error_path());
    assert!(newest[0].ends_with("message number 09"));
}

#[test]
fn daily_rotation_archives_by_date() {
    let mut t = TestLogger::with(|config| LoggerConfig {
        rotation: RotationPolicy::Daily,
        max_files: 5,
        ..config
    });
    let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();

    t.logger.write_record(&record_on(LogLevel::Info, day(1), "monday")).unwrap();
    t.logger.write_record(&record_on(LogLevel::Info, day(1), "monday again")).unwrap();
    t.logger.write_record(&record_on(LogLevel::Info, day(2), "tuesday")).unwrap();

    assert_eq!(t.file_names(), vec!["access.log", "access.log.2026-03-01"]);
    assert_eq!(t.lines(&t.dir().join("access.log.2026-03-01")).len(), 2);
    assert_eq!(t.lines(&t.access_path()).len(), 1);
}

#[test]
fn cleanup_removes_stale_archives() {
    let mut t = size_limited(60, 5);
    for i in 0..4 {
        t.logger.info(format!("message number {:02}", i)).unwrap();
    }
    let archive = t.dir().join("access.log.1");
    assert!(archive.exists());

    let long_ago = SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60);
    set_file_mtime(&archive, FileTime::from_system_time(long_ago)).unwrap();

    assert_eq!(t.logger.cleanup_old_logs(7).unwrap(), 1);
    assert!(!archive.exists());
    assert!(t.access_path().exists());
}
