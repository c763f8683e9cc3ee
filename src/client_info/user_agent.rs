//! User-agent sniffing
//!
//! Ordered substring checks over a user-agent string. The first matching
//! rule wins, so rule order matters (e.g. Edge and Opera user agents also
//! contain "Chrome").

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FIREFOX_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Firefox/(\d+\.\d+)").expect("valid regex"));
static EDGE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Edg/(\d+\.\d+)").expect("valid regex"));
static CHROME_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Chrome/(\d+\.\d+)").expect("valid regex"));
static SAFARI_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version/(\d+\.\d+)").expect("valid regex"));
static OPERA_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Opera|OPR)/(\d+\.\d+)").expect("valid regex"));

static TABLET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tablet|ipad|playbook|silk").expect("valid regex"));
static MOBILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Mobile|Android|iP(hone|od)|IEMobile|BlackBerry|Kindle|Silk-Accelerated|(hpw|web)OS|Opera M(obi|ini)",
    )
    .expect("valid regex")
});

/// Coarse device class derived from the user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    /// Tablet-class device
    Tablet,
    /// Phone-class device
    Mobile,
    /// Anything else
    Desktop,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Tablet => write!(f, "Tablet"),
            DeviceType::Mobile => write!(f, "Mobile"),
            DeviceType::Desktop => write!(f, "Desktop"),
        }
    }
}

fn capture_version(pattern: &Regex, ua: &str) -> String {
    pattern
        .captures(ua)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Browser name and `major.minor` version, e.g. `"Firefox 121.0"`.
///
/// An unrecognised browser yields `"Unknown Unknown"`; a recognised
/// browser whose version cannot be found keeps a trailing space.
pub fn browser_info(ua: &str) -> String {
    let (name, version) = if ua.contains("Firefox") {
        ("Firefox", capture_version(&FIREFOX_VERSION, ua))
    } else if ua.contains("Edg") {
        ("Edge", capture_version(&EDGE_VERSION, ua))
    } else if ua.contains("Chrome") {
        ("Chrome", capture_version(&CHROME_VERSION, ua))
    } else if ua.contains("Safari") {
        ("Safari", capture_version(&SAFARI_VERSION, ua))
    } else if ua.contains("Opera") || ua.contains("OPR") {
        ("Opera", capture_version(&OPERA_VERSION, ua))
    } else {
        ("Unknown", "Unknown".to_string())
    };
    format!("{name} {version}")
}

/// Operating system label.
pub fn os_info(ua: &str) -> String {
    let os = if ua.contains("Win") {
        if ua.contains("Windows NT 10.0") {
            "Windows 10/11"
        } else if ua.contains("Windows NT 6.3") {
            "Windows 8.1"
        } else if ua.contains("Windows NT 6.2") {
            "Windows 8"
        } else if ua.contains("Windows NT 6.1") {
            "Windows 7"
        } else {
            "Windows"
        }
    } else if ua.contains("Mac") {
        "macOS"
    } else if ua.contains("X11") || ua.contains("Linux") {
        "Linux"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("iOS") || ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else {
        "Unknown OS"
    };
    os.to_string()
}

/// "android" not followed anywhere later by "mobi" (case-insensitive).
fn is_android_tablet(ua: &str) -> bool {
    let lower = ua.to_ascii_lowercase();
    match lower.rfind("android") {
        Some(idx) => !lower[idx..].contains("mobi"),
        None => false,
    }
}

/// Classify the device as tablet, mobile or desktop.
pub fn device_type(ua: &str) -> DeviceType {
    if TABLET_PATTERN.is_match(ua) || is_android_tablet(ua) {
        DeviceType::Tablet
    } else if MOBILE_PATTERN.is_match(ua) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}
