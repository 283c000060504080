//! Console and file logger behind the [`log`] facade.
//!
//! Initialize once at program start:
//!
//! ```ignore
//! use log::LevelFilter;
//!
//! tagrange::logger::init(LevelFilter::Info, None)?;
//! log::info!("Init loop started");
//! ```
//!
//! Every record is written to stderr and, when a path is given, appended to
//! that file. Lines look like:
//!
//! ```text
//! INFO [1s 250ms] telemetry - Distance: 0.800 m
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use humantime::format_duration;
use log::{LevelFilter, Metadata, Record};

use crate::Result;

/// Logger writing to stderr and an optional file.
pub struct RangeLogger {
    level: LevelFilter,
    started: Instant,
    file_writer: Mutex<Option<BufWriter<File>>>,
}

impl RangeLogger {
    fn new(level: LevelFilter, file: Option<File>) -> Self {
        Self {
            level,
            started: Instant::now(),
            file_writer: Mutex::new(file.map(BufWriter::new)),
        }
    }

    fn uptime(&self) -> Duration {
        // Millisecond resolution keeps the timestamps short.
        Duration::from_millis(self.started.elapsed().as_millis() as u64)
    }
}

impl log::Log for RangeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "{} [{}] {} - {}\n",
            record.level(),
            format_duration(self.uptime()),
            record.target(),
            record.args()
        );
        eprint!("{}", line);

        if let Ok(mut guard) = self.file_writer.lock() {
            if let Some(writer) = guard.as_mut() {
                let _ = writer.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file_writer.lock() {
            if let Some(writer) = guard.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<RangeLogger> = OnceLock::new();

/// Install the global logger.
///
/// `log_file` is created (or truncated) before installation. Fails if the
/// file cannot be opened or a logger was already installed.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
        })
        .transpose()?;

    let logger = LOGGER.get_or_init(|| RangeLogger::new(level, file));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
