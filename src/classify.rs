//! Address and network classification
//!
//! Maps IPv4 addresses onto the private / reserved blocks that cannot be
//! traced, and ASN strings onto a small list of well-known hosting networks.

use crate::validate::is_valid_ipv4;
use ipnet::Ipv4Net;
use once_cell::sync::Lazy;
use std::net::Ipv4Addr;

/// A named non-routable IPv4 block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateRange {
    /// CIDR block
    pub net: Ipv4Net,
    /// Display name (e.g., "Loopback")
    pub name: &'static str,
}

impl std::fmt::Display for PrivateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

const RANGE_TABLE: [(&str, &str); 7] = [
    ("10.0.0.0/8", "Private Network (Class A)"),
    ("172.16.0.0/12", "Private Network (Class B)"),
    ("192.168.0.0/16", "Private Network (Class C)"),
    ("127.0.0.0/8", "Loopback"),
    ("169.254.0.0/16", "Link-Local"),
    ("224.0.0.0/4", "Multicast"),
    ("240.0.0.0/4", "Reserved"),
];

/// Private and reserved ranges in match priority order.
pub static PRIVATE_IP_RANGES: Lazy<Vec<PrivateRange>> = Lazy::new(|| {
    RANGE_TABLE
        .iter()
        .map(|&(cidr, name)| PrivateRange {
            net: cidr.parse().expect("static CIDR is valid"),
            name,
        })
        .collect()
});

/// Known datacenter/hosting ASNs (partial list)
pub const DATACENTER_ASNS: [&str; 9] = [
    "AS15169", // Google
    "AS16509", // Amazon
    "AS14618", // AWS
    "AS8075",  // Microsoft
    "AS12876", // Online SAS
    "AS20473", // Choopa (Vultr)
    "AS63949", // Linode
    "AS24940", // Hetzner
    "AS16276", // OVH
];

/// Classify a textual IPv4 address against the private/reserved ranges.
///
/// Returns `None` when the address is not valid IPv4 (IPv6 addresses are
/// never classified) or when it is publicly routable.
pub fn is_private_ip(ip: &str) -> Option<&'static PrivateRange> {
    if !is_valid_ipv4(ip) {
        return None;
    }
    // The validator allows leading zeros, which Ipv4Addr::from_str rejects.
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(ip.split('.')) {
        *slot = part.parse().ok()?;
    }
    classify_ipv4(Ipv4Addr::from(octets))
}

/// Classify an already parsed IPv4 address.
pub fn classify_ipv4(ip: Ipv4Addr) -> Option<&'static PrivateRange> {
    PRIVATE_IP_RANGES.iter().find(|range| range.net.contains(&ip))
}

/// Returns true if the ASN string exactly matches a known hosting network.
pub fn is_datacenter_ip(asn: &str) -> bool {
    DATACENTER_ASNS.contains(&asn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ranges() {
        let cases = [
            ("10.1.2.3", "Private Network (Class A)"),
            ("172.16.0.1", "Private Network (Class B)"),
            ("172.31.255.255", "Private Network (Class B)"),
            ("192.168.1.1", "Private Network (Class C)"),
            ("127.0.0.1", "Loopback"),
            ("169.254.10.20", "Link-Local"),
            ("224.0.0.251", "Multicast"),
            ("239.255.255.250", "Multicast"),
            ("240.0.0.1", "Reserved"),
            ("255.255.255.255", "Reserved"),
        ];
        for (ip, name) in cases {
            let range = is_private_ip(ip).unwrap_or_else(|| panic!("{ip} should be private"));
            assert_eq!(range.name, name, "{ip}");
        }
    }

    #[test]
    fn test_public_addresses() {
        for ip in [
            "8.8.8.8",
            "1.1.1.1",
            "172.15.255.255",
            "172.32.0.0",
            "192.169.0.1",
            "169.253.0.1",
            "223.255.255.255",
            "100.64.0.1",
        ] {
            assert!(is_private_ip(ip).is_none(), "{ip} should be public");
        }
    }

    #[test]
    fn test_non_ipv4_is_not_classified() {
        assert!(is_private_ip("::1").is_none());
        assert!(is_private_ip("fe80::1%eth0").is_none());
        assert!(is_private_ip("not-an-ip").is_none());
        assert!(is_private_ip("10.0.0").is_none());
    }

    #[test]
    fn test_leading_zero_octets() {
        let range = is_private_ip("010.000.000.001").expect("leading zeros are valid");
        assert_eq!(range.name, "Private Network (Class A)");
    }

    #[test]
    fn test_range_priority_order() {
        let names: Vec<_> = PRIVATE_IP_RANGES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "Private Network (Class A)");
        assert_eq!(names[6], "Reserved");
    }

    #[test]
    fn test_datacenter_asns() {
        assert!(is_datacenter_ip("AS15169"));
        assert!(is_datacenter_ip("AS16276"));
        assert!(!is_datacenter_ip("AS99999"));
        assert!(!is_datacenter_ip("15169"));
        assert!(!is_datacenter_ip("as15169"));
        assert!(!is_datacenter_ip(""));
    }
}
