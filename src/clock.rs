//! Local time display and the repeating clock ticker

use chrono::{DateTime, Local, TimeZone};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared slot holding the most recently formatted local time
pub type TimeSlot = Arc<Mutex<String>>;

/// Format a time as `hh:mm:ss AM/PM`
pub fn format_local_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%I:%M:%S %p").to_string()
}

/// The current local time, formatted
pub fn now_local() -> String {
    format_local_time(&Local::now())
}

/// A slot already holding the current time
pub fn time_slot() -> TimeSlot {
    Arc::new(Mutex::new(now_local()))
}

/// Spawn a task that refreshes `sink` with the local time every `period`
///
/// The task runs until aborted or until the runtime shuts down.
pub fn spawn_ticker(period: Duration, sink: TimeSlot) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let now = now_local();
            *sink.lock().expect("mutex poisoned") = now;
        }
    })
}
