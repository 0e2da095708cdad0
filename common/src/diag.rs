//! Engine diagnostics.
//!
//! Two channels, same as the firmware logging:
//! - an in-memory ring buffer ([`DebugLog`]) the host can drain and print
//! - `defmt` output when the `defmt` feature is enabled
//!
//! # Usage
//!
//! ```ignore
//! panel_debug!(self.log, "slice {} ingested", index);
//! panel_warn!(self.log, "line {} out of range", index);
//!
//! for entry in panel.debug_log_mut().drain() {
//!     println!("[{}] {}", entry.level.prefix(), entry.message);
//! }
//! ```

use heapless::{Deque, String};

// =============================================================================
// Debug Log Configuration
// =============================================================================

/// Maximum number of log lines to keep in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per log line.
pub const LOG_LINE_LENGTH: usize = 48;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
        }
    }
}

/// A single log entry.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Message, truncated to `LOG_LINE_LENGTH - 1` characters.
    pub message: String<LOG_LINE_LENGTH>,
}

// =============================================================================
// Debug Log Ring Buffer
// =============================================================================

/// Ring buffer for engine diagnostics.
///
/// Stores the last `LOG_BUFFER_SIZE` entries. Old entries are dropped when full.
pub struct DebugLog {
    buffer: Deque<LogEntry, LOG_BUFFER_SIZE>,
}

impl DebugLog {
    /// Create a new empty debug log.
    pub const fn new() -> Self { Self { buffer: Deque::new() } }

    /// Push a message. If the buffer is full, the oldest entry is dropped.
    pub fn push(
        &mut self,
        level: LogLevel,
        msg: &str,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut message: String<LOG_LINE_LENGTH> = String::new();
        for (i, c) in msg.chars().enumerate() {
            if i >= LOG_LINE_LENGTH - 1 {
                break;
            }
            if message.push(c).is_err() {
                break;
            }
        }

        self.buffer.push_back(LogEntry { level, message }).ok();
    }

    /// Iterate over entries (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.buffer.iter() }

    /// Remove and yield every entry, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = LogEntry> + '_ { core::iter::from_fn(move || self.buffer.pop_front()) }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for DebugLog {
    fn default() -> Self { Self::new() }
}

/// Format into a fixed buffer, push to a [`DebugLog`], and forward to defmt.
macro_rules! panel_log {
    ($log:expr, $level:ident, $($arg:tt)*) => {{
        use core::fmt::Write as _;
        let mut line: heapless::String<{ $crate::diag::LOG_LINE_LENGTH }> = heapless::String::new();
        let _ = write!(line, $($arg)*);
        #[cfg(feature = "defmt")]
        $crate::diag::forward_defmt($crate::diag::LogLevel::$level, line.as_str());
        $log.push($crate::diag::LogLevel::$level, line.as_str());
    }};
}

macro_rules! panel_debug {
    ($log:expr, $($arg:tt)*) => { $crate::diag::panel_log!($log, Debug, $($arg)*) };
}

macro_rules! panel_info {
    ($log:expr, $($arg:tt)*) => { $crate::diag::panel_log!($log, Info, $($arg)*) };
}

macro_rules! panel_warn {
    ($log:expr, $($arg:tt)*) => { $crate::diag::panel_log!($log, Warn, $($arg)*) };
}

pub(crate) use {panel_debug, panel_info, panel_log, panel_warn};

#[cfg(feature = "defmt")]
pub(crate) fn forward_defmt(
    level: LogLevel,
    line: &str,
) {
    match level {
        LogLevel::Debug => defmt::debug!("{=str}", line),
        LogLevel::Info => defmt::info!("{=str}", line),
        LogLevel::Warn => defmt::warn!("{=str}", line),
    }
}

// =============================================================================
// Tests
// =============================================================================
