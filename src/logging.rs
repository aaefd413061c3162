// In: src/logging.rs

//! Opt-in human-readable logging for hosts that do not install their own logger.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use once_cell::sync::OnceCell;

use crate::error::PackratError;

static INIT_LOGGER: OnceCell<()> = OnceCell::new();

/// Installs an `env_logger` at `Info` level that prints `[LEVEL] message`,
/// appending to `log_file` when one is given and to stderr otherwise.
///
/// Only the first successful call has any effect. If another logger is
/// already installed, this is a no-op.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), PackratError> {
    INIT_LOGGER.get_or_try_init(|| -> Result<(), PackratError> {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(path) = log_file {
            builder.target(env_logger::Target::Pipe(Box::new(open_log_file(path)?)));
        }

        let _ = builder.try_init();
        Ok(())
    })?;
    Ok(())
}

/// Opens `path` for appending, creating it if needed.
fn open_log_file(path: &Path) -> Result<File, PackratError> {
    Ok(OpenOptions::new().append(true).create(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_is_an_io_error() {
        let dir = std::env::temp_dir().join("packrat-missing-dir-for-log-test");
        let _ = std::fs::remove_dir_all(&dir);
        let result = open_log_file(&dir.join("nested").join("packrat.log"));
        assert!(matches!(result, Err(PackratError::Io(_))));
    }

    #[test]
    fn test_log_file_is_opened_in_append_mode() {
        use std::io::Write;

        let path = std::env::temp_dir().join(format!("packrat-append-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_repeated_calls_are_harmless() {
        enable_verbose_logging(None).unwrap();
        enable_verbose_logging(None).unwrap();
        log::info!("packrat: logging test line");
    }
}
