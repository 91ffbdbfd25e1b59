// Boot logging system for diagnostics and debugging

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::error::BootError;

/// Entries kept before new messages are dropped
pub const MAX_ENTRIES: usize = 256;

/// Output hook called for every accepted line
pub type LogSink = fn(&str);

struct LogState {
    entries: Vec<String>,
    dropped: usize,
    sink: Option<LogSink>,
}

/// Bounded in-memory log behind the `log` facade
pub struct BootLog {
    state: Mutex<LogState>,
    max_entries: usize,
}

impl BootLog {
    pub const fn new() -> Self {
        Self::with_capacity(MAX_ENTRIES)
    }

    pub const fn with_capacity(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(LogState {
                entries: Vec::new(),
                dropped: 0,
                sink: None,
            }),
            max_entries,
        }
    }

    pub fn set_sink(&self, sink: Option<LogSink>) {
        self.state.lock().sink = sink;
    }

    pub fn entries(&self) -> Vec<String> {
        self.state.lock().entries.clone()
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Messages rejected because the buffer was full
    pub fn dropped(&self) -> usize {
        self.state.lock().dropped
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.dropped = 0;
    }

    fn format_record(record: &Record<'_>) -> String {
        if cfg!(feature = "verbose_logging") {
            format!(
                "[{}] {}: {}",
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        } else {
            format!("[{}] {}", record.level(), record.args())
        }
    }
}

impl Default for BootLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for BootLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_record(record);
        let sink = {
            let mut state = self.state.lock();
            if state.entries.len() < self.max_entries {
                state.entries.push(line.clone());
            } else {
                state.dropped += 1;
            }
            state.sink
        };

        // Called unlocked so the sink may use the logger itself
        if let Some(sink) = sink {
            sink(&line);
        }
    }

    fn flush(&self) {}
}

/// Global boot logger
pub static BOOT_LOGGER: BootLog = BootLog::new();

/// Install [`BOOT_LOGGER`] as the `log` backend
pub fn init_logger(level: LevelFilter) -> Result<(), BootError> {
    log::set_logger(&BOOT_LOGGER).map_err(|_| BootError::LoggerInitFailed)?;
    log::set_max_level(level);
    Ok(())
}

pub fn set_sink(sink: LogSink) {
    BOOT_LOGGER.set_sink(Some(sink));
}

pub fn dump_log() -> Vec<String> {
    BOOT_LOGGER.entries()
}
