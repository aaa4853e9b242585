use std::fs::OpenOptions;
use std::path::PathBuf;

use log::LevelFilter;

use crate::io::config_io::{config_dir, log_level_filter};
use crate::model::LogConfig;

/// Pick the level: each -v raises it one step above the configured default.
pub fn level_for(verbosity: u8, config: &LogConfig) -> LevelFilter {
    match verbosity {
        0 => log_level_filter(&config.level).unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Where the TUI session logs go
pub fn log_file_path(config: &LogConfig) -> PathBuf {
    if config.file.trim().is_empty() {
        config_dir().join("director.log")
    } else {
        PathBuf::from(config.file.trim())
    }
}

/// Install the global logger.
///
/// While the TUI owns the terminal, records go to the log file (appended);
/// headless commands log to stderr. `RUST_LOG` overrides the level on the
/// stderr path. Returns the file path when logging to a file.
pub fn init_logging(
    verbosity: u8,
    config: &LogConfig,
    to_file: bool,
) -> Result<Option<PathBuf>, std::io::Error> {
    let level = level_for(verbosity, config);

    if to_file {
        let path = log_file_path(config);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .filter_module("tungstenite", LevelFilter::Warn)
            .filter_module("ureq", LevelFilter::Warn)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
        log::info!("logging to {} (level: {:?})", path.display(), level);
        return Ok(Some(path));
    }

    let default = level.to_string().to_lowercase();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .filter_module("tungstenite", LevelFilter::Warn)
        .filter_module("ureq", LevelFilter::Warn)
        .format_timestamp_millis()
        .try_init();
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config() {
        let config = LogConfig::default();
        assert_eq!(level_for(0, &config), LevelFilter::Warn);
        assert_eq!(level_for(1, &config), LevelFilter::Info);
        assert_eq!(level_for(2, &config), LevelFilter::Debug);
        assert_eq!(level_for(7, &config), LevelFilter::Trace);
    }

    #[test]
    fn configured_level_is_the_default() {
        let config = LogConfig {
            level: "error".into(),
            file: String::new(),
        };
        assert_eq!(level_for(0, &config), LevelFilter::Error);
    }

    #[test]
    fn explicit_log_file_wins() {
        let config = LogConfig {
            level: "warn".into(),
            file: "/tmp/d.log".into(),
        };
        assert_eq!(log_file_path(&config), PathBuf::from("/tmp/d.log"));
        assert!(log_file_path(&LogConfig::default()).ends_with("director/director.log"));
    }
}
