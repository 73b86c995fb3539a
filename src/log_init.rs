use log::{Level, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

struct FileLogger {
    file_path: PathBuf,
    level: Level,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(file, "[{}] {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// Append `debug` and more severe records to the file at `path`.
pub fn init_logger(path: impl Into<PathBuf>) -> Result<()> {
    init_logger_with_level(path, Level::Debug)
}

/// Like [`init_logger`], but `trace` shows every parser diagnostic as well.
pub fn init_logger_with_level(path: impl Into<PathBuf>, level: Level) -> Result<()> {
    let logger = FileLogger {
        file_path: path.into(),
        level,
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
