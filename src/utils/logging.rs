use anyhow::{Context, Result};
use chrono::Local;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display in the log viewer
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }

    /// Parse one line of the compact formatter output: "LEVEL target: message"
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (level, rest) = [
            (Level::TRACE, "TRACE "),
            (Level::DEBUG, "DEBUG "),
            (Level::INFO, "INFO "),
            (Level::WARN, "WARN "),
            (Level::ERROR, "ERROR "),
        ]
        .iter()
        .find_map(|(level, prefix)| line.strip_prefix(prefix).map(|rest| (*level, rest.trim_start())))
        .unwrap_or((Level::INFO, line));

        let (target, message) = match rest.find(':') {
            Some(pos) if !rest[..pos].contains(' ') => (&rest[..pos], rest[pos + 1..].trim()),
            _ => ("general", rest),
        };

        Some(Self::new(level, target, message.to_string()))
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= MAX_LOG_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => {
                let skip = entries.len().saturating_sub(count);
                entries.iter().skip(skip).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writer that feeds both the ring buffer and the session log file
#[derive(Clone)]
pub struct DualWriter {
    buffer: LogRingBuffer,
    file: Arc<Mutex<Option<File>>>,
}

impl DualWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<File>) -> Self {
        Self {
            buffer,
            file: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines() {
                if let Some(entry) = LogEntry::parse(line) {
                    if let Ok(mut file) = self.file.lock() {
                        if let Some(file) = file.as_mut() {
                            let _ = writeln!(file, "{}", entry.format_for_display());
                        }
                    }
                    self.buffer.push(entry);
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                file.flush()?;
            }
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DualWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// What `init_tracing` set up
pub struct LoggingHandle {
    pub buffer: LogRingBuffer,
    pub log_path: Option<PathBuf>,
    /// Why there is no log file, when `log_path` is `None`
    pub log_error: Option<String>,
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = log_dir.join(format!("energyvis_{}.log", timestamp));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok((file, path))
}

/// Initialize tracing with dual output (ring buffer + file).
///
/// Nothing is written to stdout or stderr; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default `info` filter.
/// Without a usable `log_dir` only the ring buffer is written; the reason
/// is logged and returned in `log_error`.
pub fn init_tracing(log_dir: Result<PathBuf>) -> LoggingHandle {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LogRingBuffer::new();
    let (file, log_path, log_error) = match log_dir.and_then(|dir| open_log_file(&dir)) {
        Ok((file, path)) => (Some(file), Some(path), None),
        Err(e) => (None, None, Some(format!("{:#}", e))),
    };

    let fmt_layer = fmt::layer()
        .with_writer(DualWriter::new(buffer.clone(), file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry adds its own timestamps
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(target: "logging", "Logging initialized");
    if let Some(e) = &log_error {
        tracing::warn!(target: "logging", "File logging disabled: {}", e);
    }

    LoggingHandle {
        buffer,
        log_path,
        log_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_line() {
        let entry = LogEntry::parse("WARN dataset_cache: Error loading field_tasks").unwrap();
        assert_eq!(entry.level, "WARN");
        assert_eq!(entry.target, "dataset_cache");
        assert_eq!(entry.message, "Error loading field_tasks");

        let entry = LogEntry::parse("plain text: with colon").unwrap();
        assert_eq!(entry.target, "general");
        assert!(LogEntry::parse("   ").is_none());
    }

    #[test]
    fn test_ring_buffer_caps_entries() {
        let buffer = LogRingBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            buffer.push(LogEntry::new(Level::DEBUG, "t", format!("m{}", i)));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        let recent = buffer.get_recent(2);
        assert_eq!(recent[1].message, format!("m{}", MAX_LOG_ENTRIES + 4));
    }

    #[test]
    fn test_dual_writer_fills_buffer_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let file = File::create(&path).unwrap();
        let buffer = LogRingBuffer::new();
        let mut writer = DualWriter::new(buffer.clone(), Some(file));

        writer.write_all(b"INFO catalog: 12 of 40 papers\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(buffer.get_recent(1)[0].message, "12 of 40 papers");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[catalog] 12 of 40 papers"));
    }

    #[test]
    fn test_open_log_file_reports_unusable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = open_log_file(&blocker).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to create log directory"));

        let (_, path) = open_log_file(dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
    }

    #[test]
    fn test_missing_log_dir_keeps_the_reason() {
        let handle = init_tracing(Err(anyhow::anyhow!("Could not determine data directory")));
        assert!(handle.log_path.is_none());
        assert_eq!(
            handle.log_error.as_deref(),
            Some("Could not determine data directory")
        );
    }
}
