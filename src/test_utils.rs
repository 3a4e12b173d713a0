//! Test utilities for commdash.
//!
//! Provides shared helpers, test data factories, and assertion macros
//! for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use commdash::test_utils::*;
//!
//! let row = make_test_report_row("2024-03-20", 120, 100, 20);
//! let dir = TestDir::new();
//! dir.create_file("config.toml", "[general]\ntimeout_seconds = 30");
//! ```

use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use crate::core::models::{CallRecord, ReportRow};

// =============================================================================
// Test Data Factories
// =============================================================================

/// Create a summary-report row with the headline metrics set.
///
/// `pending`, `not_sent`, `others` and `refund` are zero.
#[must_use]
pub fn make_test_report_row(date: &str, total: u64, success: u64, failed: u64) -> ReportRow {
    ReportRow {
        date: date.to_string(),
        total,
        success,
        failed,
        ..ReportRow::default()
    }
}

/// Create a delivered call record for `mobile`.
#[must_use]
pub fn make_test_call_record(id: &str, mobile: &str) -> CallRecord {
    CallRecord {
        id: id.to_string(),
        mobile: mobile.to_string(),
        status: "ANSWERED".to_string(),
        duration: "23".to_string(),
        submit_time: "2024-03-20 10:15:00".to_string(),
        delivery_time: "2024-03-20 10:15:31".to_string(),
        channel: "voice".to_string(),
        audio_type: "library".to_string(),
        msg_id: format!("msg-{id}"),
    }
}

/// A summary-report envelope as the voice gateway returns it.
#[must_use]
pub fn make_test_summary_payload(rows: &[(&str, u64, u64, u64)]) -> Value {
    let data: Vec<Value> = rows
        .iter()
        .map(|(date, total, success, failed)| {
            json!({
                "date": date,
                "total": total,
                "success": success,
                "failed": failed,
                "pending": 0,
                "notSent": 0,
                "others": 0,
                "refund": 0
            })
        })
        .collect();
    json!({"status": "success", "data": data})
}

/// A failure envelope carrying `reason`.
#[must_use]
pub fn make_test_error_payload(code: &str, reason: &str) -> Value {
    json!({"status": "error", "errorCode": code, "reason": reason})
}

/// Sample config TOML content for testing.
#[must_use]
pub fn make_test_config_toml() -> String {
    r#"[general]
timeout_seconds = 30
default_window_days = 14

[gateway]
voice_base_url = "http://127.0.0.1:9/VoiceApi"
sms_base_url = "http://127.0.0.1:9"

[output]
format = "human"
color = true
pretty = false
"#
    .to_string()
}

// =============================================================================
// Environment
// =============================================================================

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes environment mutation across tests and restores prior values
/// on drop.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Take the process-wide environment lock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn remember(&mut self, key: &str) {
        if !self.saved.iter().any(|(k, _)| k == key) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }
    }

    /// Set `key` for the guard's lifetime.
    #[allow(unsafe_code)]
    pub fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        // SAFETY: all mutation happens while holding ENV_LOCK.
        unsafe { std::env::set_var(key, value) };
    }

    /// Unset `key` for the guard's lifetime.
    #[allow(unsafe_code)]
    pub fn remove(&mut self, key: &str) {
        self.remember(key);
        // SAFETY: all mutation happens while holding ENV_LOCK.
        unsafe { std::env::remove_var(key) };
    }
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            // SAFETY: ENV_LOCK is still held; `_lock` drops after this body.
            unsafe {
                match value {
                    Some(v) => std::env::set_var(&key, v),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// An isolated temporary directory, removed on drop.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file with the given content, creating parents as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
    }

    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string does NOT contain a substring.
#[macro_export]
macro_rules! assert_not_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert approximate floating point equality.
#[macro_export]
macro_rules! assert_float_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_float_eq!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left;
        let right: f64 = $right;
        let epsilon: f64 = $epsilon;
        assert!(
            (left - right).abs() < epsilon,
            "Float equality assertion failed: {} != {} (epsilon: {})",
            left,
            right,
            epsilon
        );
    }};
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b')
}

/// Strip ANSI escape codes from a string.
#[must_use]
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
