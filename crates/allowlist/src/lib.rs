//! CIDR allowlist for the proxy's trust boundary.
//!
//! The allowlist is the security boundary (not the bind address — the
//! listener defaults to `0.0.0.0` so sandboxed VM networking can reach it
//! over the host bridge). Every connection is checked here before any other
//! work happens on the request path.

use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::str::FromStr;

/// The fixed set of source networks permitted to reach the proxy: loopback
/// (v4 and v6), RFC 1918 private ranges, and the IPv4-mapped-IPv6 loopback
/// range.
const DEFAULT_RANGES: &[&str] = &[
    "127.0.0.0/8",
    "::1/128",
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "::ffff:127.0.0.0/104",
];

/// Parses a fixed set of CIDR entries once at startup and answers admission
/// checks against it. Immutable after construction — never mutates, never
/// reads from configuration.
pub struct Allowlist {
    entries: Vec<IpNetwork>,
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(DEFAULT_RANGES)
    }
}

impl Allowlist {
    /// Builds an allowlist from a list of CIDR strings.
    ///
    /// # Panics
    ///
    /// Panics if any entry is not valid CIDR notation — these are
    /// compile-time constants, not user input, so a malformed entry is a
    /// programming error that should fail fast at startup.
    #[must_use]
    pub fn new(ranges: &[&str]) -> Self {
        let entries = ranges
            .iter()
            .map(|r| IpNetwork::from_str(r).unwrap_or_else(|e| panic!("invalid CIDR {r}: {e}")))
            .collect();
        Self { entries }
    }

    /// Returns `true` if `remote` matches any entry.
    ///
    /// Normalizes `::ffff:a.b.c.d` to its IPv4 form before comparison so
    /// that loopback connections accepted over a dual-stack listener are not
    /// spuriously rejected.
    #[must_use]
    pub fn is_allowed(&self, remote: IpAddr) -> bool {
        let normalized = normalize(remote);
        self.entries.iter().any(|net| net.contains(normalized))
    }
}

/// Strips a leading `::ffff:` mapped-IPv4 prefix, returning the plain IPv4
/// address it wraps. Any other address is returned unchanged.
fn normalize(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_allows_ipv4_loopback() {
        let list = Allowlist::default();
        assert!(list.is_allowed(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))));
    }

    #[test]
    fn test_allows_ipv6_loopback() {
        let list = Allowlist::default();
        assert!(list.is_allowed(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn test_allows_rfc1918_ranges() {
        let list = Allowlist::default();
        assert!(list.is_allowed(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))));
        assert!(list.is_allowed(IpAddr::V4(Ipv4Addr::new(172, 20, 0, 1))));
        assert!(list.is_allowed(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50))));
    }

    #[test]
    fn test_denies_public_address() {
        let list = Allowlist::default();
        assert!(!list.is_allowed(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
    }

    #[test]
    fn test_allows_ipv4_mapped_ipv6_loopback() {
        let list = Allowlist::default();
        let mapped = "::ffff:127.0.0.1".parse().unwrap();
        assert!(list.is_allowed(mapped));
    }

    #[test]
    fn test_denies_ipv4_mapped_ipv6_public() {
        let list = Allowlist::default();
        let mapped = "::ffff:8.8.8.8".parse().unwrap();
        assert!(!list.is_allowed(mapped));
    }

    #[test]
    fn test_custom_ranges() {
        let list = Allowlist::new(&["203.0.113.0/24"]);
        assert!(list.is_allowed(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5))));
        assert!(!list.is_allowed(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))));
    }

    #[test]
    #[should_panic(expected = "invalid CIDR")]
    fn test_invalid_cidr_panics() {
        Allowlist::new(&["not-a-cidr"]);
    }
}
