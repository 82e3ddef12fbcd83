use std::io::ErrorKind;
use std::net::{Ipv4Addr, TcpListener};

use tracing::{debug, trace};

/// Outcome of a single loopback bind attempt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PortStatus {
    /// The bind succeeded and the socket was released again.
    Free,
    /// Another socket already holds the port.
    InUse,
    /// The OS refused the bind, e.g. a privileged port without the rights for it.
    Denied,
    /// Any other bind failure.
    Unavailable(ErrorKind),
}

impl PortStatus {
    pub fn is_free(&self) -> bool {
        matches!(self, PortStatus::Free)
    }

    fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::AddrInUse => PortStatus::InUse,
            ErrorKind::PermissionDenied => PortStatus::Denied,
            other => PortStatus::Unavailable(other),
        }
    }
}

/// Binds a TCP socket to `127.0.0.1:<port>` and drops it straight away.
pub fn probe(port: u16) -> PortStatus {
    match TcpListener::bind((Ipv4Addr::LOCALHOST, port)) {
        Ok(listener) => {
            drop(listener);
            PortStatus::Free
        }
        Err(err) => PortStatus::from_error_kind(err.kind()),
    }
}

/// Finds the first free port in `start..start + max_attempts` using [`probe`].
pub fn find_available_port(start: u16, max_attempts: u16) -> Option<u16> {
    find_available_port_with(start, max_attempts, probe)
}

/// Sequential scan with a caller supplied prober.
///
/// The range is clamped at 65535 and port 0 is never handed out.
pub fn find_available_port_with<F>(start: u16, max_attempts: u16, mut prober: F) -> Option<u16>
where
    F: FnMut(u16) -> PortStatus,
{
    for port in candidate_ports(start, max_attempts) {
        let status: PortStatus = prober(port);
        trace!(port, ?status, "probed port");
        if status.is_free() {
            return Some(port);
        }
        debug!("Port {port} is not available ({status:?})");
    }
    None
}

fn candidate_ports(start: u16, max_attempts: u16) -> impl Iterator<Item = u16> {
    (start..=u16::MAX)
        .take(usize::from(max_attempts))
        .filter(|port| *port != 0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn occupied(ports: &[u16]) -> impl Fn(u16) -> PortStatus + '_ {
        move |port| {
            if ports.contains(&port) {
                PortStatus::InUse
            } else {
                PortStatus::Free
            }
        }
    }

    #[test]
    fn selector_returns_start_when_free() {
        assert_eq!(find_available_port_with(8000, 10, occupied(&[])), Some(8000));
    }

    #[test]
    fn selector_returns_smallest_free_port_in_range() {
        for free in 8000..8010u16 {
            let busy: Vec<u16> = (8000..8010).filter(|p| *p != free).collect();
            assert_eq!(
                find_available_port_with(8000, 10, occupied(&busy)),
                Some(free),
                "expected {free} to be picked"
            );
        }
    }

    #[test]
    fn selector_skips_every_kind_of_failure() {
        let result = find_available_port_with(8000, 10, |port| match port {
            8000 => PortStatus::InUse,
            8001 => PortStatus::Denied,
            8002 => PortStatus::Unavailable(ErrorKind::AddrNotAvailable),
            _ => PortStatus::Free,
        });
        assert_eq!(result, Some(8003));
    }

    #[test]
    fn selector_gives_up_after_max_attempts() {
        let busy: Vec<u16> = (8000..8010).collect();
        assert_eq!(find_available_port_with(8000, 10, occupied(&busy)), None);
    }

    #[test]
    fn selector_does_not_look_past_the_range() {
        let busy: Vec<u16> = (8000..8010).collect();
        let mut probed: Vec<u16> = Vec::new();
        let result = find_available_port_with(8000, 10, |port| {
            probed.push(port);
            occupied(&busy)(port)
        });
        assert_eq!(result, None);
        assert_eq!(probed, (8000..8010).collect::<Vec<u16>>());
    }

    #[test]
    fn selector_is_sequential_and_stops_at_first_hit() {
        let mut probed: Vec<u16> = Vec::new();
        let result = find_available_port_with(9000, 10, |port| {
            probed.push(port);
            if port == 9002 { PortStatus::Free } else { PortStatus::InUse }
        });
        assert_eq!(result, Some(9002));
        assert_eq!(probed, vec![9000, 9001, 9002]);
    }

    #[test]
    fn selector_clamps_at_top_of_port_space() {
        let mut probed: HashSet<u16> = HashSet::new();
        let result = find_available_port_with(65533, 10, |port| {
            probed.insert(port);
            PortStatus::InUse
        });
        assert_eq!(result, None);
        assert_eq!(probed, HashSet::from([65533, 65534, 65535]));
    }

    #[test]
    fn selector_never_returns_port_zero() {
        assert_eq!(find_available_port_with(0, 2, occupied(&[])), Some(1));
    }

    #[test]
    fn selector_with_zero_attempts_finds_nothing() {
        assert_eq!(find_available_port_with(8000, 0, occupied(&[])), None);
    }

    #[test]
    fn error_kinds_are_classified() {
        assert_eq!(PortStatus::from_error_kind(ErrorKind::AddrInUse), PortStatus::InUse);
        assert_eq!(
            PortStatus::from_error_kind(ErrorKind::PermissionDenied),
            PortStatus::Denied
        );
        assert_eq!(
            PortStatus::from_error_kind(ErrorKind::AddrNotAvailable),
            PortStatus::Unavailable(ErrorKind::AddrNotAvailable)
        );
    }

    #[test]
    fn probe_reports_held_port_as_in_use() {
        let holder = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port: u16 = holder.local_addr().unwrap().port();
        assert_eq!(probe(port), PortStatus::InUse);
    }

    #[test]
    fn probe_releases_its_socket() {
        let port: u16 = {
            let temp = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
            temp.local_addr().unwrap().port()
        };
        assert_eq!(probe(port), PortStatus::Free);
        assert_eq!(probe(port), PortStatus::Free);
        let rebound = TcpListener::bind((Ipv4Addr::LOCALHOST, port));
        assert!(rebound.is_ok(), "probe left port {port} bound");
    }
}
