pub mod serve;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use prefab_server_common::config::{self, Config, DEFAULT_MAX_ATTEMPTS, DEFAULT_START_PORT};

#[derive(Parser)]
#[command(name = "prefab-server")]
#[command(about = "Serves the Unity Prefab Reader to this machine and the local network.")]
#[command(version)]
pub struct CommandLine {
    /// First port to try
    #[arg(short, long, default_value_t = DEFAULT_START_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Number of consecutive ports to try before giving up
    #[arg(short, long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u16).range(1..))]
    pub attempts: u16,

    /// Address the HTTP listener binds to
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Directory to serve [default: the directory of this executable]
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Do not open a browser tab
    #[arg(long)]
    pub no_browser: bool,

    /// Less output: -q drops headers and tips
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output: -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            start_port: self.port,
            max_attempts: self.attempts,
            bind_ip: self.bind,
            root: self.root.clone().unwrap_or_else(config::default_root),
            open_browser: !self.no_browser,
            quiet: self.quiet,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
