//! Bounded operator activity log. Newest entries sit at the front; the buffer
//! never grows past [`MAX_ENTRIES`] and never ends up truly empty after a
//! manual clear.

use std::collections::VecDeque;

use chrono::Local;

pub const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Trade,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "log-info",
            Severity::Success => "log-success",
            Severity::Warning => "log-warning",
            Severity::Error => "log-error",
            Severity::Trade => "log-trade",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub ts: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push_front(LogEntry {
            ts: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            severity,
        });
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_back();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.append(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(Severity::Error, message);
    }

    pub fn trade(&mut self, message: impl Into<String>) {
        self.append(Severity::Trade, message);
    }

    /// Empties the buffer, then records that it was cleared. The buffer is
    /// never left with zero entries after an operator clear.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.info("Log cleared");
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_most_recent_fifty_newest_first() {
        let mut log = LogBuffer::new();
        for i in 0..120 {
            log.info(format!("entry {i}"));
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages[0], "entry 119");
        assert_eq!(messages[MAX_ENTRIES - 1], "entry 70");
    }

    #[test]
    fn bounded_after_any_append_sequence() {
        let mut log = LogBuffer::new();
        for i in 0..MAX_ENTRIES + 7 {
            log.warning(format!("w{i}"));
            assert!(log.len() <= MAX_ENTRIES);
        }
    }

    #[test]
    fn clear_leaves_a_cleared_marker() {
        let mut log = LogBuffer::new();
        log.error("boom");
        log.clear();
        assert_eq!(log.len(), 1);
        let first = log.iter().next().unwrap();
        assert_eq!(first.message, "Log cleared");
        assert_eq!(first.severity, Severity::Info);
    }
}
