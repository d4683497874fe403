//! Leveled stderr logging for dualvariant
//!
//! Same shape as a kernel printk: a global level, one locked stderr write
//! per line, optional flush after each line.
//!
//! # Environment Variables
//!
//! - `DUALVARIANT_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5). Default: warn
//! - `DUALVARIANT_FLUSH_EPRINT=1` - Flush stderr after each line
//!
//! # Usage
//!
//! ```ignore
//! use dualvariant_core::{dv_info, dv_warn};
//!
//! dv_info!("bound {} variant", id);
//! dv_warn!("capability marker malformed: {}", found);
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Once;

use crate::env::env_get_bool;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a level name or digit. Unknown input yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "1" => Some(LogLevel::Error),
            "warn" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[dualvariant ERROR]",
            LogLevel::Warn => "[dualvariant WARN] ",
            LogLevel::Info => "[dualvariant INFO] ",
            LogLevel::Debug => "[dualvariant DEBUG]",
            LogLevel::Trace => "[dualvariant TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static INIT: Once = Once::new();

/// Read the logging environment variables.
///
/// Runs once; called lazily on first log and by the setters. The setters
/// run it before storing, so `set_log_level` and `set_flush_enabled` always
/// take precedence over the environment.
pub fn init() {
    INIT.call_once(|| {
        let flush = env_get_bool("DUALVARIANT_FLUSH_EPRINT", false);
        FLUSH_ENABLED.store(flush, Ordering::Relaxed);
        if let Some(level) = std::env::var("DUALVARIANT_LOG_LEVEL")
            .ok()
            .and_then(|v| LogLevel::parse(&v))
        {
            LOG_LEVEL.store(level as u8, Ordering::Relaxed);
        }
    });
}

#[inline]
pub fn flush_enabled() -> bool {
    init();
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    init();
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn set_log_level(level: LogLevel) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn set_flush_enabled(enabled: bool) {
    init();
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

#[doc(hidden)]
pub fn _println_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _log_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} ", level.prefix());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

// ============================================================================
// Public Macros
// ============================================================================

/// Unleveled line to stderr
#[macro_export]
macro_rules! dv_println {
    () => {{
        $crate::kprint::_println_impl(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::kprint::_println_impl(format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! dv_error {
    ($($arg:tt)*) => {{
        $crate::kprint::_log_impl($crate::kprint::LogLevel::Error, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! dv_warn {
    ($($arg:tt)*) => {{
        $crate::kprint::_log_impl($crate::kprint::LogLevel::Warn, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! dv_info {
    ($($arg:tt)*) => {{
        $crate::kprint::_log_impl($crate::kprint::LogLevel::Info, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! dv_debug {
    ($($arg:tt)*) => {{
        $crate::kprint::_log_impl($crate::kprint::LogLevel::Debug, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! dv_trace {
    ($($arg:tt)*) => {{
        $crate::kprint::_log_impl($crate::kprint::LogLevel::Trace, format_args!($($arg)*));
    }};
}

// ============================================================================
// Tests
// ============================================================================
