use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use crate::mprint;
use crate::terminal::{colors, print};
use prefab_server_common::config::Config;
use prefab_server_common::error::LaunchError;
use prefab_server_core::launcher::{LaunchUi, Launcher, ServerUrls};

const TIPS: &[&str] = &[
    "Open the first address in a browser to use the Prefab Reader",
    "Other devices on the local network can use the second address",
    "Press Ctrl+C to stop the server",
];

pub async fn serve(mut cfg: Config) -> anyhow::Result<()> {
    cfg.root = enter_root(&cfg.root)?;
    let interrupted = interrupt_signal().context("cannot listen for Ctrl+C")?;

    let ui = ConsoleUi { quiet: cfg.quiet };
    Launcher::new(cfg, ui).run(interrupted).await?;

    Ok(())
}

/// Switches the process into `root` so relative lookups match what is served.
fn enter_root(root: &Path) -> Result<PathBuf, LaunchError> {
    let to_error = |source| LaunchError::RootDirectory {
        path: root.to_path_buf(),
        source,
    };
    let root: PathBuf = root.canonicalize().map_err(to_error)?;
    std::env::set_current_dir(&root).map_err(to_error)?;
    Ok(root)
}

// The handler is installed here, before any URL is printed.
#[cfg(unix)]
fn interrupt_signal() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        sigint.recv().await;
    })
}

#[cfg(windows)]
fn interrupt_signal() -> io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
    })
}

struct ConsoleUi {
    quiet: u8,
}

impl LaunchUi for ConsoleUi {
    fn starting(&self, root: &Path) {
        print::banner(self.quiet);
        info!("Working directory: {}", root.display());
        info!("Checking port availability...");
    }

    fn port_substituted(&self, requested: u16, chosen: u16) {
        warn!(
            "Default port {} is in use, using port {} instead",
            requested.to_string().color(colors::WARNING),
            chosen.to_string().color(colors::WARNING).bold()
        );
    }

    fn serving(&self, urls: &ServerUrls) {
        print::header("prefab reader is online", self.quiet);
        print::set_key_width(&["Local", "LAN"]);
        print::aligned_line("Local", urls.local.as_str().color(colors::URL).underline());
        print::aligned_line("LAN", urls.lan.as_str().color(colors::URL).underline());

        if self.quiet == 0 {
            print::header("tips", self.quiet);
            for (idx, tip) in TIPS.iter().enumerate() {
                print::numbered(idx + 1, tip);
            }
        }
        print::fat_separator();
    }

    fn open_browser(&self, url: &str) {
        if let Err(err) = open::that_detached(url) {
            warn!("Could not open a browser at {url}: {err}");
        }
    }

    fn stopping(&self) {
        mprint!();
        info!("Stopping server...");
    }

    fn stopped(&self) {
        info!("Server stopped");
        if self.quiet == 0 {
            print::centerln(&"Goodbye".bright_green().bold().to_string());
        }
        print::end_of_program();
    }
}
