//! In-memory record of command outcomes and failed refreshes, shown by the Logs view.

use std::collections::VecDeque;
use std::fmt;
use std::sync::OnceLock;

use chrono::Local;

use crate::core::record::{Accessors, Record, Value};

pub const LOGBOOK_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub timestamp: i64,
    pub message: String,
}

impl Record for LogEntry {
    fn accessors() -> &'static Accessors<Self> {
        static TABLE: OnceLock<Accessors<LogEntry>> = OnceLock::new();
        TABLE.get_or_init(|| {
            Accessors::<Self>::new()
                .property("level", |e| Value::Text(e.level.to_string()))
                .property("timestamp", |e| Value::Timestamp(e.timestamp))
                .property("message", |e| Value::Text(e.message.clone()))
        })
    }
}

/// Bounded, newest first.
#[derive(Debug)]
pub struct Logbook {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for Logbook {
    fn default() -> Self {
        Self::with_capacity(LOGBOOK_CAPACITY)
    }
}

impl Logbook {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        // Multi-line stderr would break the grid row.
        let message = message.into().replace(['\n', '\r'], " ");
        self.entries.push_front(LogEntry {
            level,
            timestamp: Local::now().timestamp(),
            message,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
