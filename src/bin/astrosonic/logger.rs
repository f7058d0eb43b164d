//! Log backend for the TUI: records go to a small ring of status lines
//! instead of stderr, which would tear the alternate screen.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use color_eyre::eyre::{eyre, Result as EyreResult};
use log::{Level, LevelFilter, Log, Metadata, Record};

const MAX_LINES: usize = 64;

/// Shared view of the most recent log lines.
#[derive(Clone, Default)]
pub struct StatusLog {
    lines: Arc<Mutex<VecDeque<(Level, String)>>>,
}

impl StatusLog {
    fn push(&self, level: Level, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == MAX_LINES {
                lines.pop_front();
            }
            lines.push_back((level, line));
        }
    }

    /// Newest `count` lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| {
                let skip = lines.len().saturating_sub(count);
                lines.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }
}

struct StatusLogger {
    level: LevelFilter,
    sink: StatusLog,
}

impl Log for StatusLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.sink.push(record.level(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> EyreResult<StatusLog> {
    let sink = StatusLog::default();
    let logger = Box::leak(Box::new(StatusLogger {
        level,
        sink: sink.clone(),
    }));
    log::set_logger(logger).map_err(|e| eyre!("failed to install logger: {e}"))?;
    log::set_max_level(level);
    Ok(sink)
}
