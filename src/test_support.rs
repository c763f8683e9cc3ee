//! Scripted HTTP transport for unit tests

use crate::error::FetchError;
use crate::provider::{HttpFetcher, HttpResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub const PRIMARY_8888: &str = r#"{
    "ip": "8.8.8.8",
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

pub const FALLBACK_8888: &str = r#"{
    "status": "success",
    "country": "United States",
    "countryCode": "US",
    "regionName": "Virginia",
    "city": "Ashburn",
    "zip": "20149",
    "lat": 39.03,
    "lon": -77.5,
    "timezone": "America/New_York",
    "isp": "Google LLC",
    "as": "AS15169 Google LLC",
    "query": "8.8.8.8",
    "proxy": false,
    "hosting": true
}"#;

/// Replays queued responses in order and records every requested URL
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    pub fn fail(self, error: FetchError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<HttpResponse, FetchError>) -> Self {
        self.responses
            .lock()
            .expect("mutex poisoned")
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("mutex poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mutex poisoned").len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("mutex poisoned").len()
    }
}

#[async_trait]
impl HttpFetcher for ScriptedFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, FetchError> {
        self.requests
            .lock()
            .expect("mutex poisoned")
            .push(url.to_string());
        self.responses
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Http(format!("no scripted response for {url}"))))
    }
}
