use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "director", about = concat!("[>] director v", env!("CARGO_PKG_VERSION"), " - schedule prompts for a live video engine"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/director/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override [engine] url
    #[arg(long, global = true)]
    pub engine_url: Option<String>,

    /// Override [timeline] max_frames
    #[arg(long, global = true)]
    pub max_frames: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented config template to the default path
    Init(InitArgs),
    /// Print the effective configuration
    Config,
    /// Ask the enhancement service to rewrite a prompt
    Enhance(EnhanceArgs),
    /// Play a schedule file headlessly and print engine snapshots
    Play(PlayArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct EnhanceArgs {
    /// Prompt to enhance
    pub prompt: String,
    /// The prompt that plays right before this one, for continuity
    #[arg(long, conflicts_with = "schedule")]
    pub previous: Option<String>,
    /// Take context from a schedule file: every prompt before --frame
    #[arg(long, requires = "frame")]
    pub schedule: Option<PathBuf>,
    /// Frame the prompt will be scheduled at (with --schedule)
    #[arg(long)]
    pub frame: Option<u32>,
}

#[derive(Args)]
pub struct PlayArgs {
    /// TOML schedule file ([[prompt]] tables with frame and text)
    pub file: PathBuf,
    /// Stop once the engine reaches this frame (default: last frame)
    #[arg(long)]
    pub until_frame: Option<u32>,
    /// Give up if the engine is not ready after this many seconds
    #[arg(long, default_value = "10")]
    pub connect_timeout: u64,
}
