//! Network membership checks.
//!
//! Workflows that mutate a system first make sure its IP belongs to the
//! network the caller named. The network is usually a bare address such as
//! `192.168.1.0`; its width then comes from the classful default of the
//! first octet:
//!
//! | First octet | Class | Prefix |
//! |-------------|-------|--------|
//! | 0-127       | A     | /8     |
//! | 128-191     | B     | /16    |
//! | 192-255     | C     | /24    |
//!
//! A network written with an explicit prefix (`10.1.0.0/16`) is matched as
//! CIDR instead. A bare IPv6 address has no classful default and never
//! matches.
//!
//! ```
//! use sumakit::network::is_in_network;
//!
//! assert!(is_in_network("192.168.1.10", "192.168.1.0"));
//! assert!(!is_in_network("192.168.2.10", "192.168.1.0"));
//! assert!(is_in_network("10.1.200.3", "10.1.0.0/16"));
//! ```

use ipnetwork::IpNetwork;
use std::net::{IpAddr, Ipv4Addr};

/// Whether `ip` lies inside `network`.
///
/// Returns `false` when either string fails to parse or when the two use
/// different address families.
pub fn is_in_network(ip: &str, network: &str) -> bool {
    let Ok(ip) = ip.trim().parse::<IpAddr>() else {
        return false;
    };

    match parse_network(network) {
        Some(net) => net.contains(ip),
        None => false,
    }
}

/// Parse a network string into a concrete network.
///
/// Bare IPv4 addresses get their classful prefix; `addr/prefix` is taken
/// as written.
pub fn parse_network(network: &str) -> Option<IpNetwork> {
    let network = network.trim();

    if network.contains('/') {
        return network.parse::<IpNetwork>().ok();
    }

    match network.parse::<IpAddr>().ok()? {
        IpAddr::V4(addr) => IpNetwork::new(IpAddr::V4(addr), classful_prefix(addr)).ok(),
        IpAddr::V6(_) => None,
    }
}

/// Classful default prefix length for an IPv4 address.
#[must_use]
pub fn classful_prefix(addr: Ipv4Addr) -> u8 {
    match addr.octets()[0] {
        0..=127 => 8,
        128..=191 => 16,
        _ => 24,
    }
}
