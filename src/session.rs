//! A lookup session: the orchestrator plus everything it draws on

use crate::clock::{self, TimeSlot};
use crate::client_info::{ClientEnvironment, ClientInfo};
use crate::error::{LookupError, ValidationError};
use crate::lookup::Lookup;
use crate::record::IpRecord;
use crate::render::{
    error_view, trace_marker_label, trace_view, user_marker_label, user_view, MapWidget, Section,
    Surface, LOCATED_ZOOM, WORLD_ZOOM,
};

/// Owns the lookup orchestrator, client details, map and output surface
///
/// Requests are handled one at a time; whichever finishes last determines
/// what is on screen.
pub struct Session {
    lookup: Lookup,
    client: ClientInfo,
    surface: Box<dyn Surface>,
    map: Box<dyn MapWidget>,
    local_time: TimeSlot,
}

impl Session {
    /// Create a session
    pub fn new(
        lookup: Lookup,
        env: &ClientEnvironment,
        surface: Box<dyn Surface>,
        map: Box<dyn MapWidget>,
    ) -> Self {
        Self {
            lookup,
            client: ClientInfo::probe(env),
            surface,
            map,
            local_time: clock::time_slot(),
        }
    }

    /// Read local time from `slot` instead of a private one
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.local_time = slot;
        self
    }

    /// The slot the session reads local time from
    pub fn time_slot(&self) -> TimeSlot {
        self.local_time.clone()
    }

    /// The orchestrator
    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Client details shown alongside the self-lookup
    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    fn local_time(&self) -> String {
        self.local_time.lock().expect("mutex poisoned").clone()
    }

    /// Look up and display the caller's own address
    pub async fn load(&mut self) -> Result<IpRecord, LookupError> {
        let result = self.lookup.lookup_self().await;
        let local_time = self.local_time();

        match &result {
            Ok(record) => {
                let view = user_view(record, &self.client, &local_time);
                self.surface.show_fields(Section::User, &view);
                match record.coordinates() {
                    Some((lat, lon)) => {
                        self.map.init_map(lat, lon, LOCATED_ZOOM);
                        self.map.add_marker(lat, lon, &user_marker_label(record));
                    }
                    None => self.map.init_map(0.0, 0.0, WORLD_ZOOM),
                }
            }
            Err(e) => {
                log::error!("Failed to load IP data: {}", e);
                let view = error_view(&self.client, &local_time);
                self.surface.show_fields(Section::User, &view);
                self.map.init_map(0.0, 0.0, WORLD_ZOOM);
            }
        }

        result
    }

    /// Trace a user-entered address and display the result
    pub async fn submit(&mut self, input: &str) -> Result<IpRecord, LookupError> {
        let input = input.trim();
        if input.is_empty() {
            let err = ValidationError::Empty;
            self.surface.show_error(&err.to_string());
            return Err(err.into());
        }

        let result = self.lookup.trace(input).await;
        match &result {
            Ok(record) => {
                self.surface.hide_error();
                self.surface
                    .show_fields(Section::Trace, &trace_view(input, record));
                if let Some((lat, lon)) = record.coordinates() {
                    self.map.add_marker(lat, lon, &trace_marker_label(record));
                }
            }
            Err(LookupError::Validation(e)) => self.surface.show_error(&e.to_string()),
            Err(e) => {
                log::error!("Trace error for {}: {}", input, e);
                self.surface.show_error(&format!("Error: {e}"));
            }
        }

        result
    }
}
