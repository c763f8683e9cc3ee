//! IP address syntax validation
//!
//! These checks are purely syntactic. They never normalise the input and
//! accept exactly what the patterns below encode (for example, IPv4 octets
//! with leading zeros such as `010.1.1.1`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("IPv4 pattern is valid")
});

static IPV6_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(",
        r"([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|",
        r"([0-9a-fA-F]{1,4}:){1,7}:|",
        r"([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|",
        r"([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|",
        r"([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|",
        r"([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|",
        r"([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|",
        r"[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|",
        r":((:[0-9a-fA-F]{1,4}){1,7}|:)|",
        r"fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}|",
        r"::(ffff(:0{1,4}){0,1}:){0,1}((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])|",
        r"([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])",
        r")$",
    ))
    .expect("IPv6 pattern is valid")
});

/// IP protocol version of a textual address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    /// Dotted-quad IPv4
    #[serde(rename = "IPv4")]
    V4,
    /// Colon-separated IPv6
    #[serde(rename = "IPv6")]
    V6,
    /// Neither pattern matched
    Unknown,
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
            IpVersion::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Checks whether `ip` is a syntactically valid dotted-quad IPv4 address.
pub fn is_valid_ipv4(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}

/// Checks whether `ip` is a syntactically valid IPv6 address.
///
/// Accepts full and compressed forms, link-local addresses with a zone
/// index (`fe80::1%eth0`), and IPv4-mapped / IPv4-embedded forms.
pub fn is_valid_ipv6(ip: &str) -> bool {
    IPV6_PATTERN.is_match(ip)
}

/// Derive the IP version of a textual address.
pub fn ip_version(ip: &str) -> IpVersion {
    if is_valid_ipv4(ip) {
        IpVersion::V4
    } else if is_valid_ipv6(ip) {
        IpVersion::V6
    } else {
        IpVersion::Unknown
    }
}

/// Returns true if `ip` is valid as either IPv4 or IPv6.
pub fn is_valid_ip(ip: &str) -> bool {
    ip_version(ip) != IpVersion::Unknown
}
