use prefab_server_common::network::address::{self, LOOPBACK};
use prefab_server_common::network::port::{self, PortStatus};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};

/// Finds a block of `count` consecutive free loopback ports and holds all of them.
fn hold_consecutive(count: u16) -> Vec<TcpListener> {
    for base in (40000u16..60000).step_by(101) {
        let held: Vec<TcpListener> = (base..base + count)
            .filter_map(|port| TcpListener::bind((Ipv4Addr::LOCALHOST, port)).ok())
            .collect();
        if held.len() == usize::from(count) {
            return held;
        }
    }
    panic!("could not find {count} consecutive free ports");
}

fn port_of(listener: &TcpListener) -> u16 {
    listener.local_addr().unwrap().port()
}

#[test]
fn selector_picks_smallest_released_port() {
    let mut held = hold_consecutive(10);
    let start: u16 = port_of(&held[0]);

    // Release the 4th and 7th port; the 4th must win.
    let seventh = held.remove(6);
    let fourth = held.remove(3);
    drop(seventh);
    drop(fourth);

    assert_eq!(port::find_available_port(start, 10), Some(start + 3));
}

#[test]
fn selector_reports_exhaustion_when_all_held() {
    let held = hold_consecutive(10);
    let start: u16 = port_of(&held[0]);

    assert_eq!(port::find_available_port(start, 10), None);
    assert_eq!(port::probe(start), PortStatus::InUse);
}

#[test]
fn probing_twice_gives_the_same_verdict() {
    let start: u16 = port_of(&hold_consecutive(1)[0]);

    assert!(port::probe(start).is_free());
    assert!(port::probe(start).is_free());
    assert_eq!(port::find_available_port(start, 1), Some(start));
}

#[test]
fn resolver_routes_loopback_through_loopback() {
    let target = SocketAddr::new(LOOPBACK, 53);
    assert_eq!(address::local_ip_towards(target), LOOPBACK);
}
