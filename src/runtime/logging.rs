use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{LoggingSettings, default_log_path};

/// Where log records go; the terminal belongs to the UI.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Install the global logger, appending to the log file.
///
/// `RUST_LOG` overrides `logging.level`. Returns the file in use.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = log_path(settings)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no log directory"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_file_wins() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/tmp/cadence-test.log")),
        };
        assert_eq!(
            log_path(&settings),
            Some(PathBuf::from("/tmp/cadence-test.log"))
        );
    }
}
