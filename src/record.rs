//! Canonical lookup record and the API response decoders
//!
//! The primary and fallback APIs return differently named fields. Each
//! shape has its own decoder and both produce an [`IpRecord`], so nothing
//! past this module ever sees which API answered except through
//! [`IpRecord::source`].

use crate::error::FetchError;
use crate::validate::{ip_version, IpVersion};
use serde::{Deserialize, Serialize};

/// Which API produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The primary API
    Primary,
    /// The fallback API
    Fallback,
}

/// Geolocation, network and privacy data for one IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    /// The address the API resolved
    pub ip: String,
    /// Version derived from `ip`
    pub version: Option<IpVersion>,
    /// City
    pub city: Option<String>,
    /// Region / state
    pub region: Option<String>,
    /// Country name
    pub country_name: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
    /// Country flag emoji
    pub country_flag: Option<String>,
    /// Postal code
    pub postal: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// UTC offset such as "-0800"
    pub utc_offset: Option<String>,
    /// Currency code
    pub currency: Option<String>,
    /// Currency name
    pub currency_name: Option<String>,
    /// International calling code such as "+1"
    pub country_calling_code: Option<String>,
    /// ISP or organisation
    pub org: Option<String>,
    /// Autonomous system, e.g. "AS15169"
    pub asn: Option<String>,
    /// Announced network prefix
    pub network: Option<String>,
    /// Connection type reported by the API
    pub connection_type: Option<String>,
    /// Address is a known proxy
    pub is_proxy: bool,
    /// Address belongs to a hosting provider
    pub is_hosting: bool,
    /// Address is a Tor exit node
    pub is_tor: bool,
    /// API that produced this record
    pub source: Option<Source>,
}

impl IpRecord {
    /// Both coordinates, when present and not the (0, 0) placeholder
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Body of a primary API response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrimaryResponse {
    ip: Option<String>,
    version: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    country_flag: Option<String>,
    postal: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    utc_offset: Option<String>,
    currency: Option<String>,
    currency_name: Option<String>,
    country_calling_code: Option<String>,
    org: Option<String>,
    asn: Option<String>,
    network: Option<String>,
    connection_type: Option<String>,
    is_proxy: Option<bool>,
    is_hosting: Option<bool>,
    is_tor: Option<bool>,
    error: Option<bool>,
    reason: Option<String>,
}

/// Body of a fallback API response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FallbackResponse {
    status: Option<String>,
    message: Option<String>,
    query: Option<String>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    zip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    timezone: Option<String>,
    isp: Option<String>,
    #[serde(rename = "as")]
    as_name: Option<String>,
    proxy: Option<bool>,
    hosting: Option<bool>,
}

/// A decoded response from either API
#[derive(Debug, Clone)]
pub enum ApiPayload {
    /// Primary API shape
    Primary(PrimaryResponse),
    /// Fallback API shape
    Fallback(FallbackResponse),
}

impl ApiPayload {
    /// Resolve the payload into the canonical record
    pub fn into_record(self) -> Result<IpRecord, FetchError> {
        match self {
            ApiPayload::Primary(body) => primary_into_record(body),
            ApiPayload::Fallback(body) => fallback_into_record(body),
        }
    }
}

fn primary_into_record(body: PrimaryResponse) -> Result<IpRecord, FetchError> {
    if body.error.unwrap_or(false) {
        return Err(FetchError::Api(
            body.reason
                .unwrap_or_else(|| "Failed to fetch IP data".to_string()),
        ));
    }
    let ip = body
        .ip
        .ok_or_else(|| FetchError::Decode("missing field `ip`".to_string()))?;

    let version = match body.version.as_deref() {
        Some("IPv4") => IpVersion::V4,
        Some("IPv6") => IpVersion::V6,
        _ => ip_version(&ip),
    };

    Ok(IpRecord {
        version: Some(version),
        ip,
        city: body.city,
        region: body.region,
        country_name: body.country_name,
        country_code: body.country_code,
        country_flag: body.country_flag,
        postal: body.postal,
        latitude: body.latitude,
        longitude: body.longitude,
        timezone: body.timezone,
        utc_offset: body.utc_offset,
        currency: body.currency,
        currency_name: body.currency_name,
        country_calling_code: body.country_calling_code,
        org: body.org,
        asn: body.asn,
        network: body.network,
        connection_type: body.connection_type,
        is_proxy: body.is_proxy.unwrap_or(false),
        is_hosting: body.is_hosting.unwrap_or(false),
        is_tor: body.is_tor.unwrap_or(false),
        source: Some(Source::Primary),
    })
}

fn fallback_into_record(body: FallbackResponse) -> Result<IpRecord, FetchError> {
    if body.status.as_deref() != Some("success") {
        return Err(FetchError::Api(
            body.message
                .unwrap_or_else(|| "Fallback lookup did not succeed".to_string()),
        ));
    }
    let ip = body
        .query
        .ok_or_else(|| FetchError::Decode("missing field `query`".to_string()))?;

    Ok(IpRecord {
        version: Some(ip_version(&ip)),
        ip,
        city: body.city,
        region: body.region_name,
        country_name: body.country,
        country_code: body.country_code,
        postal: body.zip,
        latitude: body.lat,
        longitude: body.lon,
        timezone: body.timezone,
        org: body.isp,
        asn: body.as_name,
        network: Some("N/A".to_string()),
        is_proxy: body.proxy.unwrap_or(false),
        is_hosting: body.hosting.unwrap_or(false),
        source: Some(Source::Fallback),
        ..IpRecord::default()
    })
}

/// Decode a primary API body into a record
pub fn decode_primary(body: &str) -> Result<IpRecord, FetchError> {
    let parsed: PrimaryResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    ApiPayload::Primary(parsed).into_record()
}

/// Decode a fallback API body into a record
pub fn decode_fallback(body: &str) -> Result<IpRecord, FetchError> {
    let parsed: FallbackResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    ApiPayload::Fallback(parsed).into_record()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY_BODY: &str = r#"{
        "ip": "8.8.8.8",
        "network": "8.8.8.0/24",
        "version": "IPv4",
        "city": "Mountain View",
        "region": "California",
        "country_name": "United States",
        "country_code": "US",
        "postal": "94043",
        "latitude": 37.42301,
        "longitude": -122.083352,
        "timezone": "America/Los_Angeles",
        "utc_offset": "-0700",
        "country_calling_code": "+1",
        "currency": "USD",
        "currency_name": "Dollar",
        "asn": "AS15169",
        "org": "GOOGLE"
    }"#;

    const FALLBACK_BODY: &str = r#"{
        "status": "success",
        "country": "United States",
        "countryCode": "US",
        "region": "VA",
        "regionName": "Virginia",
        "city": "Ashburn",
        "zip": "20149",
        "lat": 39.03,
        "lon": -77.5,
        "timezone": "America/New_York",
        "isp": "Google LLC",
        "org": "Google Public DNS",
        "as": "AS15169 Google LLC",
        "query": "8.8.8.8",
        "proxy": false,
        "hosting": true
    }"#;

    #[test]
    fn test_decode_primary() {
        let record = decode_primary(PRIMARY_BODY).expect("valid body");
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.version, Some(IpVersion::V4));
        assert_eq!(record.city.as_deref(), Some("Mountain View"));
        assert_eq!(record.asn.as_deref(), Some("AS15169"));
        assert_eq!(record.network.as_deref(), Some("8.8.8.0/24"));
        assert_eq!(record.source, Some(Source::Primary));
        assert!(!record.is_proxy);
        assert_eq!(record.coordinates(), Some((37.42301, -122.083352)));
    }

    #[test]
    fn test_decode_primary_error_body() {
        let err = decode_primary(r#"{"ip": "999.1.1.1", "error": true, "reason": "Invalid IP Address"}"#)
            .expect_err("error body must fail");
        assert_eq!(err, FetchError::Api("Invalid IP Address".to_string()));

        let err = decode_primary(r#"{"error": true}"#).expect_err("error body must fail");
        assert_eq!(err, FetchError::Api("Failed to fetch IP data".to_string()));
    }

    #[test]
    fn test_decode_primary_garbage() {
        assert!(matches!(
            decode_primary("<html>Too many requests</html>"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(decode_primary("{}"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_decode_fallback_maps_fields() {
        let record = decode_fallback(FALLBACK_BODY).expect("valid body");
        assert_eq!(record.ip, "8.8.8.8");
        assert_eq!(record.version, Some(IpVersion::V4));
        assert_eq!(record.region.as_deref(), Some("Virginia"));
        assert_eq!(record.country_name.as_deref(), Some("United States"));
        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.postal.as_deref(), Some("20149"));
        assert_eq!(record.org.as_deref(), Some("Google LLC"));
        assert_eq!(record.asn.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(record.network.as_deref(), Some("N/A"));
        assert!(record.is_hosting);
        assert!(!record.is_proxy);
        assert!(!record.is_tor);
        assert_eq!(record.currency, None);
        assert_eq!(record.source, Some(Source::Fallback));
    }

    #[test]
    fn test_decode_fallback_ipv6_version() {
        let record = decode_fallback(r#"{"status": "success", "query": "2001:4860:4860::8888"}"#)
            .expect("valid body");
        assert_eq!(record.version, Some(IpVersion::V6));
    }

    #[test]
    fn test_decode_fallback_failure_status() {
        let err = decode_fallback(r#"{"status": "fail", "message": "reserved range"}"#)
            .expect_err("fail status");
        assert_eq!(err, FetchError::Api("reserved range".to_string()));
    }

    #[test]
    fn test_zero_coordinates_are_absent() {
        let record = IpRecord {
            latitude: Some(0.0),
            longitude: Some(12.0),
            ..IpRecord::default()
        };
        assert_eq!(record.coordinates(), None);
    }
}
