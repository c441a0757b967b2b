//! Shared helpers for `timegate-infra` integration tests.

#![allow(dead_code)]

use std::io::Write;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::{Builder, NamedTempFile};

/// Weekday mornings 10:00-11:00 and weekend afternoons 15:00-16:00.
pub const WEEKDAY_WEEKEND_RULES: [(&str, &str); 2] =
    [("0 10 * * 1-5", "0 11 * * 1-5"), ("0 15 * * 0,6", "0 16 * * 0,6")];

/// Write `contents` to a temp file named `*.{extension}`.
///
/// The file is removed when the returned handle is dropped.
pub fn config_file(extension: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("timegate-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("temp file should be created");
    file.write_all(contents.as_bytes()).expect("temp file should be writable");
    file
}

/// Build a UTC timestamp.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
