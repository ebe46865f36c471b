use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use dockpot::app;
use dockpot::config::{Cli, Config};
use dockpot::logging;

fn main() -> ExitCode {
    let config = Config::from(Cli::parse());

    let _log_guard = match logging::init(config.log_file.as_deref(), config.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("dockpot: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Leave the terminal usable if anything panics while in raw mode.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        app::restore_terminal();
        default_hook(info);
    }));

    match app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("dockpot: {e}");
            ExitCode::FAILURE
        }
    }
}
