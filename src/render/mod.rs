//! Record presentation
//!
//! Everything here is a pure function from records to a flat, ordered
//! field-name → text mapping. Writing those fields somewhere (terminal,
//! JSON, a map) is the job of the [`Surface`] and [`MapWidget`]
//! collaborators.

pub mod surface;

use crate::classify::{is_datacenter_ip, is_private_ip};
use crate::client_info::ClientInfo;
use crate::record::IpRecord;
use crate::validate::ip_version;
use serde::Serialize;

pub use surface::{JsonSurface, MapWidget, Section, Surface, TextMap, TextSurface};

/// Text shown for absent fields
pub const PLACEHOLDER: &str = "N/A";

/// Zoom level used when centring on a located address
pub const LOCATED_ZOOM: u8 = 10;
/// Zoom level of the world view shown without a location
pub const WORLD_ZOOM: u8 = 2;

/// Ordered field-name → display-text mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldView {
    fields: Vec<(&'static str, String)>,
}

impl FieldView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push((name, value.into()));
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the view has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(n, _)| *n).collect()
    }

    /// Convert to a JSON object of strings
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(n, v)| ((*n).to_string(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Non-empty text or the placeholder
fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn is_datacenter(record: &IpRecord) -> bool {
    non_empty(record.asn.as_deref()).is_some_and(is_datacenter_ip)
}

fn push_client_fields(view: &mut FieldView, client: &ClientInfo, local_time: &str) {
    view.push("browser", client.browser.clone());
    view.push("os", client.os.clone());
    view.push("device", client.device.to_string());
    view.push("screen", client.screen.clone());
    view.push("language", client.language.clone());
    view.push("platform", client.platform.clone());
    view.push("cookies", client.cookies.clone());
    view.push("local_time", local_time);
}

/// Privacy indicators for a record, or "Standard" when there are none
pub fn privacy_status(record: &IpRecord) -> String {
    let mut indicators = Vec::new();
    if is_private_ip(&record.ip).is_some() {
        indicators.push("Private IP");
    }
    if record.is_proxy {
        indicators.push("Proxy Detected");
    }
    if record.is_hosting || is_datacenter(record) {
        indicators.push("Hosting/VPN Likely");
    }
    if record.is_tor {
        indicators.push("Tor Exit Node");
    }

    if indicators.is_empty() {
        "Standard".to_string()
    } else {
        indicators.join(", ")
    }
}

/// Fields describing the caller's own address and client
pub fn user_view(record: &IpRecord, client: &ClientInfo, local_time: &str) -> FieldView {
    let mut view = FieldView::new();
    let version = record.version.unwrap_or_else(|| ip_version(&record.ip));
    let private_range = is_private_ip(&record.ip);
    let datacenter = is_datacenter(record);
    let connection = non_empty(record.connection_type.as_deref());

    view.push("ip", record.ip.clone());

    let ip_type = if let Some(range) = private_range {
        format!("{version} ({})", range.name)
    } else if datacenter {
        format!("{version} (Datacenter/Hosting)")
    } else if let Some(conn) = connection {
        format!("{version} ({conn})")
    } else {
        version.to_string()
    };
    view.push("ip_type", ip_type);

    view.push("isp", text_or_na(record.org.as_deref()));
    view.push("asn", text_or_na(record.asn.as_deref()));
    view.push("network", text_or_na(record.network.as_deref()));

    let connection_type = if datacenter {
        "Datacenter/Hosting".to_string()
    } else if let Some(conn) = connection {
        conn.to_string()
    } else if private_range.is_some() {
        "Private Network".to_string()
    } else {
        "Unknown".to_string()
    };
    view.push("connection_type", connection_type);
    view.push("privacy", privacy_status(record));

    view.push("city", text_or_na(record.city.as_deref()));
    view.push("region", text_or_na(record.region.as_deref()));
    view.push(
        "country",
        format!(
            "{} {}",
            text_or_na(record.country_name.as_deref()),
            record.country_flag.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string(),
    );
    view.push("postal", text_or_na(record.postal.as_deref()));

    let timezone = match (
        non_empty(record.timezone.as_deref()),
        non_empty(record.utc_offset.as_deref()),
    ) {
        (Some(tz), Some(offset)) => format!("{tz} (UTC{offset})"),
        (Some(tz), None) => tz.to_string(),
        _ => PLACEHOLDER.to_string(),
    };
    view.push("timezone", timezone);

    let currency = match non_empty(record.currency.as_deref()) {
        Some(code) => format!(
            "{code} ({})",
            record.currency_name.as_deref().unwrap_or("")
        ),
        None => PLACEHOLDER.to_string(),
    };
    view.push("currency", currency);

    let coordinates = record
        .coordinates()
        .map_or_else(|| PLACEHOLDER.to_string(), |(lat, lon)| format!("{lat:.4}, {lon:.4}"));
    view.push("coordinates", coordinates);
    view.push(
        "calling_code",
        text_or_na(record.country_calling_code.as_deref()),
    );

    push_client_fields(&mut view, client, local_time);
    view
}

/// Fields describing a traced address
///
/// `input_ip` is the address as submitted; the record's own `ip` field is
/// what the API resolved.
pub fn trace_view(input_ip: &str, record: &IpRecord) -> FieldView {
    let mut view = FieldView::new();
    let datacenter = is_datacenter(record);

    view.push("ip", record.ip.clone());
    view.push("city", text_or_na(record.city.as_deref()));
    view.push("region", text_or_na(record.region.as_deref()));
    view.push(
        "country",
        format!(
            "{} {} ({})",
            text_or_na(record.country_name.as_deref()),
            record.country_flag.as_deref().unwrap_or(""),
            non_empty(record.country_code.as_deref()).unwrap_or("-")
        ),
    );

    let mut isp = text_or_na(record.org.as_deref());
    if datacenter {
        isp.push_str(" (Datacenter/Hosting)");
    }
    if record.is_proxy {
        isp.push_str(" (Proxy Detected)");
    }
    view.push("isp", isp);

    let (lat, lon) = match record.coordinates() {
        Some((lat, lon)) => (format!("{lat:.6}"), format!("{lon:.6}")),
        None => (
            record
                .latitude
                .filter(|v| *v != 0.0)
                .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.6}")),
            record
                .longitude
                .filter(|v| *v != 0.0)
                .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.6}")),
        ),
    };
    view.push("latitude", lat);
    view.push("longitude", lon);

    view.push("asn", text_or_na(record.asn.as_deref()));
    view.push("timezone", text_or_na(record.timezone.as_deref()));

    let version = ip_version(input_ip);
    let ip_type = if datacenter {
        format!("{version} (Datacenter)")
    } else if let Some(conn) = non_empty(record.connection_type.as_deref()) {
        format!("{version} ({conn})")
    } else {
        version.to_string()
    };
    view.push("ip_type", ip_type);
    view
}

/// Fields shown when the self-lookup failed entirely
///
/// Client information is still reported since it never depends on the
/// network.
pub fn error_view(client: &ClientInfo, local_time: &str) -> FieldView {
    let mut view = FieldView::new();
    view.push("ip", "Error loading IP data");
    push_client_fields(&mut view, client, local_time);
    view
}

/// Marker label for the caller's own location
pub fn user_marker_label(record: &IpRecord) -> String {
    format!(
        "Your Location: {}, {}",
        record.city.as_deref().unwrap_or("undefined"),
        record.country_name.as_deref().unwrap_or("undefined")
    )
}

/// Marker label for a traced location
pub fn trace_marker_label(record: &IpRecord) -> String {
    format!(
        "{}, {}",
        non_empty(record.city.as_deref()).unwrap_or("Unknown"),
        non_empty(record.country_name.as_deref()).unwrap_or("Unknown")
    )
}
