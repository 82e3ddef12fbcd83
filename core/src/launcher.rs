use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use prefab_server_common::config::Config;
use prefab_server_common::error::LaunchError;
use prefab_server_common::network::{address, port};

use crate::phase::Phase;
use crate::server::StaticServer;

/// Addresses the server can be reached on once bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerUrls {
    pub local: String,
    pub lan: String,
}

impl ServerUrls {
    pub fn new(port: u16, lan_ip: IpAddr) -> Self {
        Self {
            local: http_url(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            lan: http_url(lan_ip, port),
        }
    }
}

fn http_url(ip: IpAddr, port: u16) -> String {
    format!("http://{}", SocketAddr::new(ip, port))
}

/// Everything the launcher shows to, or does for, the person running it.
pub trait LaunchUi {
    fn starting(&self, root: &Path);
    fn port_substituted(&self, requested: u16, chosen: u16);
    fn serving(&self, urls: &ServerUrls);
    fn open_browser(&self, url: &str);
    fn stopping(&self);
    fn stopped(&self);
}

/// How long in-flight connections get to finish after an interrupt.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

pub struct Launcher<U: LaunchUi> {
    cfg: Config,
    ui: U,
    phase: Phase,
    drain_timeout: Duration,
}

impl<U: LaunchUi> Launcher<U> {
    pub fn new(cfg: Config, ui: U) -> Self {
        Self {
            cfg,
            ui,
            phase: Phase::Idle,
            drain_timeout: DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// Runs the whole lifecycle, returning once `shutdown` resolved and the server drained.
    pub async fn run<F>(mut self, shutdown: F) -> Result<(), LaunchError>
    where
        F: Future<Output = ()>,
    {
        self.advance();
        self.ui.starting(&self.cfg.root);
        let port: u16 = self.select_port()?;

        let server = StaticServer::bind(SocketAddr::new(self.cfg.bind_ip, port), &self.cfg.root).await?;
        self.advance();
        if let Ok(addr) = server.local_addr() {
            debug!("Listening on {addr}");
        }

        let urls = ServerUrls::new(port, address::local_ip());
        self.ui.serving(&urls);
        if self.cfg.open_browser {
            self.ui.open_browser(&urls.local);
        }

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serving = server.serve(async move {
            let _ = stop_rx.await;
        });
        tokio::pin!(serving);
        self.advance();

        tokio::select! {
            result = &mut serving => return result,
            _ = shutdown => {
                self.ui.stopping();
                let _ = stop_tx.send(());
            }
        }

        // Stalled clients would otherwise keep the drain open forever.
        match tokio::time::timeout(self.drain_timeout, serving).await {
            Ok(result) => result?,
            Err(_elapsed) => warn!(
                "Connections still open after {:?}, closing them",
                self.drain_timeout
            ),
        }
        self.advance();
        debug_assert!(self.phase.is_terminal());
        self.ui.stopped();
        Ok(())
    }

    fn select_port(&self) -> Result<u16, LaunchError> {
        let (start_port, max_attempts) = (self.cfg.start_port, self.cfg.max_attempts);
        let port = port::find_available_port(start_port, max_attempts)
            .ok_or_else(|| LaunchError::no_available_port(start_port, max_attempts))?;

        if port != start_port {
            self.ui.port_substituted(start_port, port);
        }
        Ok(port)
    }

    fn advance(&mut self) {
        if let Some(next) = self.phase.next() {
            debug!("Launcher: {} -> {}", self.phase, next);
            self.phase = next;
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
