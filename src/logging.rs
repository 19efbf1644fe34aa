//! File-backed logging. The terminal belongs to the game, so nothing is ever
//! written to stdout or stderr while it runs.

use crate::config::AppConfig;
use crate::error::Error;
use env_logger::{Builder, Target};
use std::fs::OpenOptions;

/// Install the global logger. Returns `false` when logging is disabled by an
/// empty `log_file`.
pub fn init(config: &AppConfig) -> Result<bool, Error> {
    let Some(mut builder) = builder(config)? else {
        return Ok(false);
    };
    builder.try_init()?;
    Ok(true)
}

fn builder(config: &AppConfig) -> Result<Option<Builder>, Error> {
    if config.log_file.as_os_str().is_empty() {
        return Ok(None);
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| Error::LogFile {
            path: config.log_file.clone(),
            source,
        })?;

    let mut builder = Builder::new();
    builder
        .parse_filters(&config.log_level)
        .parse_env("RUST_LOG")
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)));
    Ok(Some(builder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_path_disables_logging() {
        let config = AppConfig {
            log_file: PathBuf::new(),
            ..AppConfig::default()
        };
        assert!(builder(&config).unwrap().is_none());
    }

    #[test]
    fn test_log_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        let config = AppConfig {
            log_file: path.clone(),
            ..AppConfig::default()
        };
        assert!(builder(&config).unwrap().is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_file: dir.path().join("missing").join("game.log"),
            ..AppConfig::default()
        };
        assert!(matches!(builder(&config), Err(Error::LogFile { .. })));
    }
}
