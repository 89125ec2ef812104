//! User-facing transcript of a staging run.
//!
//! The workflow never prints directly. Each operation receives a `LogSink` and
//! pushes tagged lines into it; the front end decides how to render them.
//! Structured diagnostics go through `tracing` separately.

use std::fmt;

/// Informal severity tag of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    Ok,
    Warn,
    Error,
    Info,
    Done,
}

impl LogTag {
    pub fn label(self) -> &'static str {
        match self {
            LogTag::Ok => "OK",
            LogTag::Warn => "Warn",
            LogTag::Error => "Error",
            LogTag::Info => "Info",
            LogTag::Done => "Done",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One transcript line, rendered as `[Tag] message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub tag: LogTag,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag, self.message)
    }
}

/// Ordered sink for transcript lines.
pub trait LogSink {
    /// Drop everything shown so far (a fresh run starts with an empty transcript).
    fn clear(&mut self);

    fn push(&mut self, tag: LogTag, message: String);

    fn ok(&mut self, message: String) {
        self.push(LogTag::Ok, message);
    }

    fn warn(&mut self, message: String) {
        self.push(LogTag::Warn, message);
    }

    fn error(&mut self, message: String) {
        self.push(LogTag::Error, message);
    }

    fn info(&mut self, message: String) {
        self.push(LogTag::Info, message);
    }

    fn done(&mut self, message: String) {
        self.push(LogTag::Done, message);
    }
}

/// In-memory sink; keeps lines in push order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<LogLine>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Number of lines carrying `tag`.
    pub fn count(&self, tag: LogTag) -> usize {
        self.lines.iter().filter(|l| l.tag == tag).count()
    }

    /// Transcript as `[Tag] message` strings.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

impl LogSink for MemorySink {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn push(&mut self, tag: LogTag, message: String) {
        self.lines.push(LogLine { tag, message });
    }
}
