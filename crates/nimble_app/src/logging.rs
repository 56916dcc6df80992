//! Logger setup.
//!
//! [`init`] installs a `fern` dispatch with two outputs: formatted lines on
//! stderr and a [`LogPanel`], the bounded buffer the editor's log window
//! reads from.  Script failures land in the panel this way.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use log::Level;

use crate::config::LoggingConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Shared ring buffer of recent log records.  Clones share the buffer.
#[derive(Debug, Clone)]
pub struct LogPanel {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogPanel {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, dropping the oldest one when full.
    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the buffered entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Entries at `level` or more severe.
    pub fn filtered(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level <= level)
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Build the dispatch without installing it.
pub fn dispatch(config: &LoggingConfig, panel: LogPanel) -> Result<fern::Dispatch, ConfigError> {
    let level = config.level_filter()?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let panel_output = fern::Dispatch::new().chain(fern::Output::call(move |record| {
        panel.push(LogEntry {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        })
    }));

    Ok(fern::Dispatch::new()
        .level(level)
        .chain(console)
        .chain(panel_output))
}

/// Install the global logger.  Fails if one is already set.
pub fn init(config: &LoggingConfig, panel: LogPanel) -> anyhow::Result<()> {
    dispatch(config, panel)?.apply()?;
    log::debug!("logging initialised at level {}", config.level);
    Ok(())
}
