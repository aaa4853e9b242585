use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::model::DirectorConfig;

/// Error type for loading and writing config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Directory holding config.toml and the default log file,
/// respecting XDG_CONFIG_HOME
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"));
    base.join("director")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file at the default location yields defaults; a missing file
/// that was named explicitly is an error.
pub fn load_config(path: Option<&Path>) -> Result<DirectorConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };
    if !explicit && !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(DirectorConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: DirectorConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
    validate(&config)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Reject values the timeline math cannot work with.
pub fn validate(config: &DirectorConfig) -> Result<(), ConfigError> {
    let tl = &config.timeline;
    if tl.max_frames == 0 {
        return Err(ConfigError::Invalid(
            "timeline.max_frames must be at least 1".into(),
        ));
    }
    if tl.tolerance == 0 {
        return Err(ConfigError::Invalid(
            "timeline.tolerance must be at least 1".into(),
        ));
    }
    if tl.fps == 0 {
        return Err(ConfigError::Invalid("timeline.fps must be at least 1".into()));
    }
    if tl.tick_interval == 0 {
        return Err(ConfigError::Invalid(
            "timeline.tick_interval must be at least 1".into(),
        ));
    }
    // The link is built without TLS support; a wss:// handshake can never finish.
    if config.engine.url.starts_with("wss://") {
        return Err(ConfigError::Invalid(format!(
            "engine.url: wss:// is not supported, use a ws:// URL (got \"{}\")",
            config.engine.url
        )));
    }
    if !config.engine.url.starts_with("ws://") {
        return Err(ConfigError::Invalid(format!(
            "engine.url must be a ws:// URL, got \"{}\"",
            config.engine.url
        )));
    }
    if log_level_filter(&config.log.level).is_none() {
        return Err(ConfigError::Invalid(format!(
            "log.level must be one of off, error, warn, info, debug, trace; got \"{}\"",
            config.log.level
        )));
    }
    Ok(())
}

/// Parse a level name the way `log` spells them
pub fn log_level_filter(level: &str) -> Option<log::LevelFilter> {
    level.trim().parse().ok()
}

const TEMPLATE: &str = r##"# director configuration

[engine]
url = "ws://127.0.0.1:8080/ws"
connect_on_start = false

[timeline]
max_frames = 240
tolerance = 5
fps = 24
tick_interval = 10

[enhance]
url = "http://127.0.0.1:3000/api/enhance-prompt"
api_key = ""
timeout_secs = 30

[log]
level = "warn"
# file = "/tmp/director.log"

# [ui.colors]
# highlight = "#FB4196"
"##;

/// Write the commented default config to `path`.
pub fn write_template(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, TEMPLATE).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: DirectorConfig = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(config, DirectorConfig::default());
    }

    #[test]
    fn write_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        write_template(&path, false).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.timeline.max_frames, 240);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[timeline]\nmax_frames = 100\n").unwrap();
        assert!(matches!(
            write_template(&path, false),
            Err(ConfigError::AlreadyExists { .. })
        ));
        write_template(&path, true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().timeline.max_frames, 240);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.toml");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[timeline\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn zero_max_frames_is_invalid() {
        let mut config = DirectorConfig::default();
        config.timeline.max_frames = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn engine_url_must_be_websocket() {
        let mut config = DirectorConfig::default();
        config.engine.url = "http://localhost:8080".into();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("engine.url"));
    }

    #[test]
    fn secure_websocket_is_rejected() {
        let mut config = DirectorConfig::default();
        config.engine.url = "wss://engine.example:443/ws".into();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("wss:// is not supported"));

        config.engine.url = "ws://engine.example:8080/ws".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn log_levels() {
        assert_eq!(log_level_filter("warn"), Some(log::LevelFilter::Warn));
        assert_eq!(log_level_filter("DEBUG"), Some(log::LevelFilter::Debug));
        assert_eq!(log_level_filter("loud"), None);
    }
}
