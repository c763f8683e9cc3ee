//! geotrace - IP geolocation lookup
//!
//! This library looks up where an IP address is, both for the caller's own
//! public address and for arbitrary addresses. It validates and classifies
//! input, caches responses, retries the primary API and falls back to a
//! secondary one, and renders records into display-ready fields.

pub mod cache;
pub mod classify;
pub mod client_info;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod provider;
pub mod record;
pub mod render;
pub mod session;
pub mod validate;

#[cfg(test)]
mod test_support;

// Re-export core types for library users
pub use cache::{CacheKey, ResponseCache};
pub use classify::{is_datacenter_ip, is_private_ip, PrivateRange};
pub use client_info::{ClientEnvironment, ClientInfo, DeviceType};
pub use config::{LookupConfig, LookupConfigBuilder};
pub use error::{FetchError, LookupError, ValidationError};
pub use lookup::{validate_trace_input, Lookup, LookupState};
pub use provider::{FallbackProvider, HttpFetcher, HttpResponse, ReqwestFetcher};
pub use record::{IpRecord, Source};
pub use render::{FieldView, MapWidget, Section, Surface};
pub use session::Session;
pub use validate::{ip_version, is_valid_ip, is_valid_ipv4, is_valid_ipv6, IpVersion};
