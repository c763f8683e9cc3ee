//! Output collaborators: where rendered fields and map markers go

use super::FieldView;
use serde::Serialize;
use std::io::Write;

/// Which block of output a view belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// The caller's own address and client details
    User,
    /// Result of tracing an address
    Trace,
}

impl Section {
    /// Heading used by text output
    pub fn title(&self) -> &'static str {
        match self {
            Section::User => "Your IP",
            Section::Trace => "Trace Result",
        }
    }
}

/// Destination for rendered views and inline errors
pub trait Surface: Send {
    /// Display a block of fields
    fn show_fields(&mut self, section: Section, view: &FieldView);
    /// Display an inline error message
    fn show_error(&mut self, message: &str);
    /// Clear any inline error message
    fn hide_error(&mut self);
}

/// Map display
pub trait MapWidget: Send {
    /// Reset the map to a centre and zoom level
    fn init_map(&mut self, lat: f64, lon: f64, zoom: u8);
    /// Place the single marker, replacing any previous one, and centre on it
    fn add_marker(&mut self, lat: f64, lon: f64, label: &str);
}

/// Human-readable label for a field name
pub fn field_label(name: &str) -> &str {
    match name {
        "ip" => "IP Address",
        "ip_type" => "IP Type",
        "isp" => "ISP",
        "asn" => "ASN",
        "network" => "Network",
        "connection_type" => "Connection",
        "privacy" => "Privacy",
        "city" => "City",
        "region" => "Region",
        "country" => "Country",
        "postal" => "Postal Code",
        "timezone" => "Timezone",
        "currency" => "Currency",
        "coordinates" => "Coordinates",
        "calling_code" => "Calling Code",
        "latitude" => "Latitude",
        "longitude" => "Longitude",
        "browser" => "Browser",
        "os" => "OS",
        "device" => "Device",
        "screen" => "Screen",
        "language" => "Language",
        "platform" => "Platform",
        "cookies" => "Cookies",
        "local_time" => "Local Time",
        other => other,
    }
}

/// Plain-text output
pub struct TextSurface<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
}

impl TextSurface<std::io::Stdout, std::io::Stderr> {
    /// Fields on stdout, errors on stderr
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> TextSurface<O, E> {
    /// Text output to the given writers
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Consume the surface and return its writers
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> Surface for TextSurface<O, E> {
    fn show_fields(&mut self, section: Section, view: &FieldView) {
        let width = view
            .iter()
            .map(|(name, _)| field_label(name).len())
            .max()
            .unwrap_or(0);

        let mut block = format!("\n{}\n", section.title());
        for (name, value) in view.iter() {
            block.push_str(&format!("  {:width$}  {}\n", field_label(name), value));
        }
        if let Err(e) = self.out.write_all(block.as_bytes()) {
            log::warn!("Failed to write output: {}", e);
        }
    }

    fn show_error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "{message}") {
            log::warn!("Failed to write output: {}", e);
        }
    }

    fn hide_error(&mut self) {}
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonLine<'a> {
    Fields {
        section: Section,
        fields: serde_json::Value,
    },
    Error {
        error: &'a str,
    },
    Marker {
        marker: MarkerJson<'a>,
    },
}

#[derive(Serialize)]
struct MarkerJson<'a> {
    latitude: f64,
    longitude: f64,
    label: &'a str,
}

fn write_json_line<W: Write>(out: &mut W, line: &JsonLine<'_>) {
    let result = serde_json::to_string(line)
        .map_err(std::io::Error::other)
        .and_then(|s| writeln!(out, "{s}"));
    if let Err(e) = result {
        log::warn!("Failed to write JSON output: {}", e);
    }
}

/// One JSON object per line
pub struct JsonSurface<W: Write + Send> {
    out: W,
}

impl JsonSurface<std::io::Stdout> {
    /// JSON lines on stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonSurface<W> {
    /// JSON lines to the given writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the surface and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Surface for JsonSurface<W> {
    fn show_fields(&mut self, section: Section, view: &FieldView) {
        write_json_line(
            &mut self.out,
            &JsonLine::Fields {
                section,
                fields: view.to_json(),
            },
        );
    }

    fn show_error(&mut self, message: &str) {
        write_json_line(&mut self.out, &JsonLine::Error { error: message });
    }

    fn hide_error(&mut self) {}
}

/// Current map state
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    /// Centre latitude
    pub lat: f64,
    /// Centre longitude
    pub lon: f64,
    /// Zoom level
    pub zoom: u8,
    /// Marker position and label, if any
    pub marker: Option<(f64, f64, String)>,
}

/// Map widget that reports marker placement as text
pub struct TextMap<W: Write + Send> {
    out: W,
    json: bool,
    state: Option<MapState>,
}

impl TextMap<std::io::Stdout> {
    /// Marker reports on stdout
    pub fn stdout(json: bool) -> Self {
        Self::new(std::io::stdout(), json)
    }
}

impl<W: Write + Send> TextMap<W> {
    /// Marker reports to the given writer, as text or JSON lines
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            state: None,
        }
    }

    /// The current map state, `None` before the first `init_map`
    pub fn state(&self) -> Option<&MapState> {
        self.state.as_ref()
    }

    /// Consume the map and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> MapWidget for TextMap<W> {
    fn init_map(&mut self, lat: f64, lon: f64, zoom: u8) {
        // A located map starts with an unlabelled marker; only explicit
        // markers are reported.
        let marker = (lat != 0.0 || lon != 0.0).then(|| (lat, lon, "Location".to_string()));
        self.state = Some(MapState {
            lat,
            lon,
            zoom,
            marker,
        });
    }

    fn add_marker(&mut self, lat: f64, lon: f64, label: &str) {
        let state = self.state.get_or_insert(MapState {
            lat: 0.0,
            lon: 0.0,
            zoom: super::WORLD_ZOOM,
            marker: None,
        });
        state.lat = lat;
        state.lon = lon;
        state.zoom = super::LOCATED_ZOOM;
        state.marker = Some((lat, lon, label.to_string()));

        if self.json {
            write_json_line(
                &mut self.out,
                &JsonLine::Marker {
                    marker: MarkerJson {
                        latitude: lat,
                        longitude: lon,
                        label,
                    },
                },
            );
        } else if let Err(e) = writeln!(self.out, "  Map marker: {label} @ {lat:.4}, {lon:.4}") {
            log::warn!("Failed to write output: {}", e);
        }
    }
}
