mod enhance;
mod play;

pub use enhance::cmd_enhance;
pub use play::cmd_play;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::model::DirectorConfig;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a headless subcommand against the effective config.
pub fn dispatch(
    command: Commands,
    cli: &Cli,
    config: DirectorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match command {
        Commands::Init(args) => cmd_init(args, cli, json),
        Commands::Config => cmd_config(&config, json),
        Commands::Enhance(args) => cmd_enhance(args, &config, json),
        Commands::Play(args) => cmd_play(args, &config, json),
    }
}

/// Load the config file, apply command-line overrides and validate.
pub fn effective_config(cli: &Cli) -> Result<DirectorConfig, ConfigError> {
    let mut config = config_io::load_config(cli.config.as_deref())?;
    if let Some(url) = &cli.engine_url {
        config.engine.url = url.clone();
    }
    if let Some(max_frames) = cli.max_frames {
        config.timeline.max_frames = max_frames;
    }
    config_io::validate(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

/// Write the commented template. Runs before the config is loaded so a
/// broken file can be replaced with `--force`.
pub fn cmd_init(args: InitArgs, cli: &Cli, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli.config.clone().unwrap_or_else(config_io::config_path);
    let existed = path.exists();
    config_io::write_template(&path, args.force)?;
    if json {
        let out = InitJson {
            path: path.display().to_string(),
            overwritten: existed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_config(config: &DirectorConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn flags_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[timeline]\nmax_frames = 480\n").unwrap();
        let cli = Cli::parse_from([
            "director",
            "-c",
            path.to_str().unwrap(),
            "--engine-url",
            "ws://engine:9000/ws",
            "config",
        ]);
        let config = effective_config(&cli).unwrap();
        assert_eq!(config.engine.url, "ws://engine:9000/ws");
        assert_eq!(config.timeline.max_frames, 480);

        let cli = Cli::parse_from(["director", "-c", path.to_str().unwrap(), "--max-frames", "96"]);
        assert_eq!(effective_config(&cli).unwrap().timeline.max_frames, 96);
    }

    #[test]
    fn override_is_validated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        let cli = Cli::parse_from([
            "director",
            "-c",
            path.to_str().unwrap(),
            "--engine-url",
            "http://engine/ws",
        ]);
        assert!(matches!(
            effective_config(&cli),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["director", "-vv", "play", "show.toml"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Play(_))));
    }
}
