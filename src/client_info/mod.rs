//! Client information probe
//!
//! Collects facts about the local client that never depend on the network:
//! browser, OS and device derived from the user agent, plus screen,
//! language, platform and cookie support.

pub mod user_agent;

use serde::{Deserialize, Serialize};

pub use user_agent::{browser_info, device_type, os_info, DeviceType};

/// Default user agent sent with lookups and used for client detection
pub const DEFAULT_USER_AGENT: &str = concat!("geotrace/", env!("CARGO_PKG_VERSION"));

/// Screen dimensions as reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    /// Width in pixels (or columns for a terminal)
    pub width: u32,
    /// Height in pixels (or rows for a terminal)
    pub height: u32,
    /// Colour depth in bits
    pub color_depth: u8,
}

/// Raw inputs for the client probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvironment {
    /// User agent string
    pub user_agent: String,
    /// Screen dimensions, if known
    pub screen: Option<Screen>,
    /// Preferred language tag (e.g. "en-US")
    pub language: Option<String>,
    /// Platform identifier (e.g. "linux x86_64")
    pub platform: Option<String>,
    /// Whether cookies are enabled
    pub cookies_enabled: bool,
}

impl ClientEnvironment {
    /// Create an environment with only a user agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            screen: None,
            language: None,
            platform: None,
            cookies_enabled: false,
        }
    }

    /// Detect the environment of the current process
    ///
    /// Language comes from `LC_ALL` or `LANG`, screen size from the
    /// `COLUMNS`/`LINES` variables a shell exports, and the platform from
    /// the compile-time OS and architecture. The HTTP client keeps no
    /// cookie store, so cookies are reported as disabled.
    pub fn detect(user_agent: impl Into<String>) -> Self {
        let language = ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
            .map(|v| locale_to_language_tag(&v));

        let screen = match (env_u32("COLUMNS"), env_u32("LINES")) {
            (Some(width), Some(height)) => Some(Screen {
                width,
                height,
                color_depth: 24,
            }),
            _ => None,
        };

        Self {
            user_agent: user_agent.into(),
            screen,
            language,
            platform: Some(format!(
                "{} {}",
                std::env::consts::OS,
                std::env::consts::ARCH
            )),
            cookies_enabled: false,
        }
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// "en_US.UTF-8" -> "en-US"
fn locale_to_language_tag(locale: &str) -> String {
    let base = locale.split(['.', '@']).next().unwrap_or(locale);
    base.replace('_', "-")
}

/// Display-ready client information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Browser name and version
    pub browser: String,
    /// Operating system
    pub os: String,
    /// Device class
    pub device: DeviceType,
    /// Screen description, e.g. "1920x1080 (24-bit)"
    pub screen: String,
    /// Language tag
    pub language: String,
    /// Platform
    pub platform: String,
    /// "Enabled" or "Disabled"
    pub cookies: String,
}

impl ClientInfo {
    /// Derive client information from raw inputs
    pub fn probe(env: &ClientEnvironment) -> Self {
        let ua = env.user_agent.as_str();
        Self {
            browser: browser_info(ua),
            os: os_info(ua),
            device: device_type(ua),
            screen: env.screen.map_or_else(
                || "Unknown".to_string(),
                |s| format!("{}x{} ({}-bit)", s.width, s.height, s.color_depth),
            ),
            language: env
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            platform: env
                .platform
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            cookies: if env.cookies_enabled {
                "Enabled".to_string()
            } else {
                "Disabled".to_string()
            },
        }
    }
}
