use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Every port in the scanned range refused a loopback bind.
    #[error("no available port in {start}..{end} ({attempts} attempts), another program may be holding them")]
    NoAvailablePort { start: u16, end: u32, attempts: u16 },

    #[error("cannot serve from {}: {source}", .path.display())]
    RootDirectory { path: PathBuf, source: io::Error },

    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("HTTP server stopped unexpectedly: {0}")]
    Serve(#[source] io::Error),
}

impl LaunchError {
    pub fn no_available_port(start: u16, attempts: u16) -> Self {
        Self::NoAvailablePort {
            start,
            end: (u32::from(start) + u32::from(attempts)).min(u32::from(u16::MAX) + 1),
            attempts,
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
