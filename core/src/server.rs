use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use prefab_server_common::error::LaunchError;

/// A bound, not yet serving, static file HTTP server.
pub struct StaticServer {
    listener: TcpListener,
    root: PathBuf,
}

impl StaticServer {
    /// Binds the listener on `addr` for files below `root`.
    ///
    /// Fails with [`LaunchError::RootDirectory`] if `root` is not a readable directory.
    pub async fn bind(addr: SocketAddr, root: impl Into<PathBuf>) -> Result<Self, LaunchError> {
        let root: PathBuf = root.into();
        check_root(&root)?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| LaunchError::Bind { addr, source })?;
        debug!("HTTP listener bound on {addr}, serving {}", root.display());

        Ok(Self { listener, root })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until `shutdown` resolves, then lets in-flight requests finish.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), LaunchError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(&self.root))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(LaunchError::Serve)
    }
}

/// Every path is looked up below `root`; directories answer with their `index.html`.
pub fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
        .layer(middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path: String = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "\"{method} {path}\" {} {:.1}ms",
        response.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    response
}

fn check_root(root: &Path) -> Result<(), LaunchError> {
    let metadata = std::fs::metadata(root).map_err(|source| LaunchError::RootDirectory {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(LaunchError::RootDirectory {
            path: root.to_path_buf(),
            source: io::Error::other("not a directory"),
        });
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
