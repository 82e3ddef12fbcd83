use prefab_server_common::config::Config;
use prefab_server_common::error::LaunchError;
use prefab_server_core::launcher::{LaunchUi, Launcher, ServerUrls};
use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

/// Forwards the serving URLs so the test knows when requests can be made.
struct ChannelUi {
    urls: mpsc::UnboundedSender<ServerUrls>,
}

impl LaunchUi for ChannelUi {
    fn starting(&self, _root: &Path) {}
    fn port_substituted(&self, _requested: u16, _chosen: u16) {}
    fn serving(&self, urls: &ServerUrls) {
        let _ = self.urls.send(urls.clone());
    }
    fn open_browser(&self, url: &str) {
        panic!("browser opened at {url} although disabled");
    }
    fn stopping(&self) {}
    fn stopped(&self) {}
}

fn site_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

fn free_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    listener.local_addr().unwrap().port()
}

fn config(start_port: u16) -> Config {
    Config {
        start_port,
        max_attempts: 10,
        bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        root: site_root(),
        open_browser: false,
        quiet: 1,
    }
}

async fn get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn launcher_serves_the_site_until_stopped() {
    let start: u16 = free_port();
    let (urls_tx, mut urls_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let launcher = Launcher::new(config(start), ChannelUi { urls: urls_tx });
    let handle = tokio::spawn(launcher.run(async move {
        let _ = stop_rx.await;
    }));

    let urls: ServerUrls = urls_rx.recv().await.unwrap();
    assert_eq!(urls.local, format!("http://127.0.0.1:{start}"));
    assert!(urls.lan.starts_with("http://"));
    assert!(urls.lan.ends_with(&format!(":{start}")));

    let index = get(start, "/").await;
    assert!(index.starts_with("HTTP/1.1 200"), "unexpected response: {index}");
    assert!(index.contains("Unity Prefab Reader"));

    let prefab = get(start, "/prefabs/Crate.prefab").await;
    assert!(prefab.starts_with("HTTP/1.1 200"), "unexpected response: {prefab}");
    assert!(prefab.contains("m_Name: Crate"));

    let escape = get(start, "/../Cargo.toml").await;
    assert!(!escape.starts_with("HTTP/1.1 200"), "served outside root: {escape}");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert!(TcpListener::bind((Ipv4Addr::UNSPECIFIED, start)).is_ok());
}

#[tokio::test]
async fn launcher_refuses_a_root_that_is_not_a_directory() {
    let (urls_tx, mut urls_rx) = mpsc::unbounded_channel();
    let mut cfg = config(free_port());
    cfg.root = site_root().join("index.html");

    let result = Launcher::new(cfg, ChannelUi { urls: urls_tx }).run(async {}).await;

    assert!(matches!(result, Err(LaunchError::RootDirectory { .. })));
    assert!(urls_rx.try_recv().is_err());
}
