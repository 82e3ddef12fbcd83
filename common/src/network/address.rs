use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use tracing::debug;

/// Public address used only to pick a route. No datagram is ever sent to it.
pub const ROUTE_PROBE_TARGET: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

pub const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Best guess at the address other machines on the LAN can reach us on.
///
/// Falls back to `127.0.0.1` when no route can be determined.
pub fn local_ip() -> IpAddr {
    local_ip_towards(ROUTE_PROBE_TARGET)
}

/// Same as [`local_ip`] but routes towards `target` instead of the public resolver.
pub fn local_ip_towards(target: SocketAddr) -> IpAddr {
    match resolve_route_source_ip(target) {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(ip) => {
            debug!("Route towards {target} resolved to {ip}, using loopback instead");
            LOOPBACK
        }
        Err(err) => {
            debug!("Could not determine local IP: {err}");
            LOOPBACK
        }
    }
}

fn resolve_route_source_ip(target: SocketAddr) -> io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(target)?;
    Ok(socket.local_addr()?.ip())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
