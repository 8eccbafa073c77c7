// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGER: ConsoleLogger = ConsoleLogger;
static SHOW_TARGET: AtomicBool = AtomicBool::new(false);

struct ConsoleLogger;

/// Installs the stderr logger. `show_target` prefixes each line with the
/// emitting module, useful together with debug output.
pub fn init(level: LevelFilter, show_target: bool) -> Result<(), SetLoggerError> {
  SHOW_TARGET.store(show_target, Ordering::Relaxed);
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Level from the CLI's -v / -q counters.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
  if quiet {
    return LevelFilter::Warn;
  }
  match verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

fn icon(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴",
    Level::Warn => "🟠",
    Level::Info => "🔵",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }

    // Format: "🔴  File not found"
    let line = if SHOW_TARGET.load(Ordering::Relaxed) {
      format!("{}  [{}] {}\n", icon(record.level()), record.target(), record.args())
    } else {
      format!("{}  {}\n", icon(record.level()), record.args())
    };

    let _ = std::io::stderr().lock().write_all(line.as_bytes());
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_level_from_flags() {
    assert_eq!(level_from_flags(0, false), LevelFilter::Info);
    assert_eq!(level_from_flags(1, false), LevelFilter::Debug);
    assert_eq!(level_from_flags(3, false), LevelFilter::Trace);
    assert_eq!(level_from_flags(2, true), LevelFilter::Warn);
  }
}
