use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::model::SortKey;

/// Interactive dashboard for Docker containers and their processes.
#[derive(Parser, Debug)]
#[command(name = "dockpot")]
#[command(version)]
#[command(about = "Interactive terminal dashboard for Docker containers", long_about = None)]
pub struct Cli {
    /// Refresh interval in milliseconds
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(100..))]
    pub interval: u64,

    /// Docker daemon address: unix:///path, /path, tcp://host:port or http://host:port
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Hide stopped containers
    #[arg(long)]
    pub running_only: bool,

    /// Initial sort column: name, image, id, command, uptime, status, cpu, ram
    #[arg(short, long, default_value = "name")]
    pub sort: SortKey,

    /// Start with every container's processes expanded
    #[arg(short, long)]
    pub all_processes: bool,

    /// Print one snapshot as JSON and exit
    #[arg(long)]
    pub once: bool,

    /// Write logs to this file (the terminal is owned by the dashboard)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Runtime settings resolved from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub interval: Duration,
    pub host: Option<String>,
    pub include_stopped: bool,
    pub sort_key: SortKey,
    pub show_all_processes: bool,
    pub once: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: u8,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            interval: Duration::from_millis(cli.interval),
            host: cli.host,
            include_stopped: !cli.running_only,
            sort_key: cli.sort,
            show_all_processes: cli.all_processes,
            once: cli.once,
            log_file: cli.log_file,
            verbose: cli.verbose,
        }
    }
}
