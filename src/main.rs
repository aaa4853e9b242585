use clap::Parser;
use director::cli::commands::{Cli, Commands};
use director::cli::handlers;
use director::io::logging;

fn main() {
    let mut cli = Cli::parse();

    // Init is handled before the config is loaded so a broken file can be replaced
    if let Some(Commands::Init(args)) = cli.command.take_if(|c| matches!(c, Commands::Init(_))) {
        if let Err(e) = handlers::cmd_init(args, &cli, cli.json) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match handlers::effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let tui = cli.command.is_none();
    if let Err(e) = logging::init_logging(cli.verbose, &config.log, tui) {
        eprintln!("error: could not open log file: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command.take() {
        // No subcommand → launch TUI
        None => director::tui::run(config),
        Some(cmd) => handlers::dispatch(cmd, &cli, config),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
