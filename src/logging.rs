//! `log` backend setup.
//!
//! The TUI owns the terminal, so records go to a file under the state
//! directory. The filter is read from `SYMTYPE_LOG` using env_logger's
//! directive syntax and defaults to `info`.

use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub const LOG_ENV: &str = "SYMTYPE_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub enum LogSink {
    File(PathBuf),
    Stderr,
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, DEFAULT_FILTER));
    builder.format_timestamp_millis();
    builder
}

/// Installs the global logger. Calling it twice keeps the first logger.
pub fn init(sink: LogSink) -> std::io::Result<()> {
    let mut builder = builder();
    match sink {
        LogSink::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        LogSink::Stderr => {
            builder.target(Target::Stderr);
        }
    }
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_sink_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("symtype.log");
        init(LogSink::File(path.clone())).unwrap();
        assert!(path.exists());
        // second init is harmless
        init(LogSink::Stderr).unwrap();
    }
}
