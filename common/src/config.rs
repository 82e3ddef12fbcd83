use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

pub const DEFAULT_START_PORT: u16 = 8000;
pub const DEFAULT_MAX_ATTEMPTS: u16 = 10;

pub struct Config {
    /// First port the selector probes.
    pub start_port: u16,
    /// How many consecutive ports are probed before giving up.
    pub max_attempts: u16,
    /// Address the HTTP listener binds to. All interfaces unless overridden.
    pub bind_ip: IpAddr,
    /// Directory the static files are served from.
    ///
    /// The process also changes into this directory before serving.
    pub root: PathBuf,
    /// Opens the loopback URL in the default browser once the server is bound.
    pub open_browser: bool,
    /// 0 prints everything, 1 drops headers and tips.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_port: DEFAULT_START_PORT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            root: default_root(),
            open_browser: true,
            quiet: 0,
        }
    }
}

/// The directory holding the running executable, or `.` when it cannot be determined.
pub fn default_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
