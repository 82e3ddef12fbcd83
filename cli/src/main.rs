mod commands;
mod terminal;

use std::io::IsTerminal;
use std::process::ExitCode;

use commands::{CommandLine, serve};
use prefab_server_common::error::LaunchError;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.verbose);

    match serve::serve(commands.to_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => failed(err),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Failure {
    /// Every candidate port was taken.
    NoPort,
    /// The server was already online when it went down.
    ServerDied,
    /// Anything else before the server came up.
    Startup,
}

impl Failure {
    fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<LaunchError>() {
            Some(LaunchError::NoAvailablePort { .. }) => Failure::NoPort,
            Some(LaunchError::Serve(_)) => Failure::ServerDied,
            _ => Failure::Startup,
        }
    }
}

fn failed(err: anyhow::Error) -> ExitCode {
    match Failure::of(&err) {
        Failure::NoPort => error!("{err}"),
        Failure::ServerDied => error!("{err:#}"),
        Failure::Startup => {
            error!("Failed to start the server: {err:#}");
            wait_for_key();
        }
    }
    ExitCode::FAILURE
}

/// Keeps a double-clicked console window open long enough to read the error.
fn wait_for_key() {
    let term = console::Term::stdout();
    if !term.is_term() || !std::io::stdin().is_terminal() {
        return;
    }
    print::print_status("Press any key to exit...");
    let _ = term.read_key();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
