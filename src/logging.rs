//! File logging
//!
//! Standard output carries the menu, so log lines only ever go to rotating
//! files in a directory chosen on the command line.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "tracker";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start logging into `log_dir`
///
/// The returned handle flushes pending lines when dropped, it must be kept
/// alive until the program exits.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle, String> {
    let level = normalize_level(level)?;
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!("failed to create log directory `{}`: {}", log_dir.display(), err)
    })?;
    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{}`: {}", level, err))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {}", err))?;
    info!(
        "event=start status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION"),
    );
    Ok(logger)
}

/// `debug` for debug builds, `info` for release builds
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error",
            other
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(normalize_level("INFO"), Ok("info"));
        assert_eq!(normalize_level(" warning "), Ok("warn"));
        assert_eq!(normalize_level("trace"), Ok("trace"));
        let err = normalize_level("verbose").unwrap_err();
        assert!(err.contains("verbose"));
        assert!(normalize_level(default_log_level()).is_ok());
    }

    #[test]
    fn bad_level_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        assert!(init_logging("loud", &logs).is_err());
        assert!(!logs.exists());
    }
}
