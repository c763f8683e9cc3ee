//! Geolocation API endpoints and the HTTP transport seam

pub mod http;

use crate::config::LookupConfig;
use serde::{Deserialize, Serialize};

pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};

/// Default base URL of the primary API
pub const DEFAULT_PRIMARY_BASE: &str = "https://ipapi.co";

/// Fields requested from the fallback API
pub const FALLBACK_FIELDS: &str =
    "status,message,country,countryCode,region,regionName,city,zip,lat,lon,timezone,isp,org,as,query,proxy,hosting";

/// Fallback geolocation services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallbackProvider {
    /// ipapi.co queried with an explicit field list
    #[default]
    IpapiCo,
    /// ip-api.com (plain HTTP on the free tier)
    IpApiCom,
}

impl FallbackProvider {
    /// Default base URL for this provider
    pub fn default_base(&self) -> &'static str {
        match self {
            FallbackProvider::IpapiCo => "https://ipapi.co",
            FallbackProvider::IpApiCom => "http://ip-api.com",
        }
    }

    /// Get all available providers
    pub fn all() -> &'static [FallbackProvider] {
        &[FallbackProvider::IpapiCo, FallbackProvider::IpApiCom]
    }
}

impl std::fmt::Display for FallbackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackProvider::IpapiCo => write!(f, "ipapi.co"),
            FallbackProvider::IpApiCom => write!(f, "ip-api.com"),
        }
    }
}

/// Resolved request URLs for both APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    primary_base: String,
    fallback: FallbackProvider,
    fallback_base: String,
}

impl Endpoints {
    /// Build endpoints from a lookup configuration
    pub fn from_config(config: &LookupConfig) -> Self {
        let fallback_base = config
            .fallback_base
            .clone()
            .unwrap_or_else(|| config.fallback.default_base().to_string());
        Self {
            primary_base: config.primary_base.trim_end_matches('/').to_string(),
            fallback: config.fallback,
            fallback_base: fallback_base.trim_end_matches('/').to_string(),
        }
    }

    /// Primary API URL; `None` means the caller's own address
    pub fn primary_url(&self, ip: Option<&str>) -> String {
        match ip {
            None => format!("{}/json/", self.primary_base),
            Some(ip) => format!("{}/{}/json/", self.primary_base, path_segment(ip)),
        }
    }

    /// Fallback API URL; `None` means the caller's own address
    pub fn fallback_url(&self, ip: Option<&str>) -> String {
        let base = &self.fallback_base;
        match (self.fallback, ip) {
            (FallbackProvider::IpapiCo, None) | (FallbackProvider::IpApiCom, None) => {
                format!("{base}/json/?fields={FALLBACK_FIELDS}")
            }
            (FallbackProvider::IpapiCo, Some(ip)) => {
                format!("{base}/{}/json/?fields={FALLBACK_FIELDS}", path_segment(ip))
            }
            (FallbackProvider::IpApiCom, Some(ip)) => {
                format!("{base}/json/{}?fields={FALLBACK_FIELDS}", path_segment(ip))
            }
        }
    }
}

/// Escape the zone separator of link-local IPv6 addresses
fn path_segment(ip: &str) -> String {
    ip.replace('%', "%25")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(fallback: FallbackProvider) -> Endpoints {
        let config = LookupConfig::builder()
            .fallback(fallback)
            .build()
            .expect("valid config");
        Endpoints::from_config(&config)
    }

    #[test]
    fn test_primary_urls() {
        let ep = endpoints(FallbackProvider::IpapiCo);
        assert_eq!(ep.primary_url(None), "https://ipapi.co/json/");
        assert_eq!(ep.primary_url(Some("8.8.8.8")), "https://ipapi.co/8.8.8.8/json/");
    }

    #[test]
    fn test_ipapi_co_fallback_urls() {
        let ep = endpoints(FallbackProvider::IpapiCo);
        assert_eq!(
            ep.fallback_url(None),
            format!("https://ipapi.co/json/?fields={FALLBACK_FIELDS}")
        );
        assert_eq!(
            ep.fallback_url(Some("1.1.1.1")),
            format!("https://ipapi.co/1.1.1.1/json/?fields={FALLBACK_FIELDS}")
        );
    }

    #[test]
    fn test_ip_api_com_fallback_urls() {
        let ep = endpoints(FallbackProvider::IpApiCom);
        assert_eq!(
            ep.fallback_url(None),
            format!("http://ip-api.com/json/?fields={FALLBACK_FIELDS}")
        );
        assert_eq!(
            ep.fallback_url(Some("1.1.1.1")),
            format!("http://ip-api.com/json/1.1.1.1?fields={FALLBACK_FIELDS}")
        );
    }

    #[test]
    fn test_base_overrides_and_trailing_slash() {
        let config = LookupConfig::builder()
            .primary_base("http://localhost:8080/")
            .fallback_base("http://localhost:8081/")
            .build()
            .expect("valid config");
        let ep = Endpoints::from_config(&config);
        assert_eq!(ep.primary_url(None), "http://localhost:8080/json/");
        assert!(ep.fallback_url(None).starts_with("http://localhost:8081/json/?fields="));
    }

    #[test]
    fn test_zone_index_is_escaped() {
        let ep = endpoints(FallbackProvider::IpapiCo);
        assert_eq!(
            ep.primary_url(Some("fe80::1%eth0")),
            "https://ipapi.co/fe80::1%25eth0/json/"
        );
    }

    #[test]
    fn test_provider_all() {
        let providers = FallbackProvider::all();
        assert_eq!(providers.len(), 2);
        assert_eq!(FallbackProvider::default(), FallbackProvider::IpapiCo);
        assert_eq!(FallbackProvider::IpApiCom.to_string(), "ip-api.com");
    }
}
