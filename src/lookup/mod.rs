//! Lookup orchestrator
//!
//! Resolves an address (or the caller's own address) into an [`IpRecord`]:
//! cache check, primary API with one retry, fallback API on rate limiting
//! or repeated failure. Network errors never escape this module except as
//! [`LookupError::AllAttemptsFailed`].

mod state;

use crate::cache::{CacheKey, ResponseCache};
use crate::classify::is_private_ip;
use crate::config::LookupConfig;
use crate::error::{FetchError, LookupError, ValidationError};
use crate::provider::{Endpoints, HttpFetcher, ReqwestFetcher};
use crate::record::{decode_fallback, decode_primary, IpRecord};
use crate::validate::{is_valid_ipv4, is_valid_ipv6};
use std::sync::Arc;

pub use state::LookupState;

/// Check a trace request before any network activity
///
/// Returns the trimmed address on success.
pub fn validate_trace_input(input: &str) -> Result<String, ValidationError> {
    let ip = input.trim();
    if ip.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !is_valid_ipv4(ip) && !is_valid_ipv6(ip) {
        return Err(ValidationError::InvalidFormat);
    }
    if let Some(range) = is_private_ip(ip) {
        return Err(ValidationError::PrivateAddress { range: range.name });
    }
    Ok(ip.to_string())
}

/// Geolocation lookup service with response caching and API fallback
///
/// # Examples
///
/// ```no_run
/// use geotrace::lookup::Lookup;
/// use geotrace::LookupConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let lookup = Lookup::new(LookupConfig::default())?;
///
///     let record = lookup.trace("8.8.8.8").await?;
///     println!("{} is in {:?}", record.ip, record.city);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Lookup {
    fetcher: Arc<dyn HttpFetcher>,
    endpoints: Endpoints,
    cache: Arc<ResponseCache<IpRecord>>,
    config: LookupConfig,
}

impl std::fmt::Debug for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup")
            .field("endpoints", &self.endpoints)
            .field("cached", &self.cache.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Lookup {
    /// Create a lookup service that talks HTTP through reqwest
    pub fn new(config: LookupConfig) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(&config.user_agent)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a lookup service with a custom transport
    pub fn with_fetcher(config: LookupConfig, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            fetcher,
            endpoints: Endpoints::from_config(&config),
            cache: Arc::new(ResponseCache::new(config.cache_ttl)),
            config,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// The record cache
    pub fn cache(&self) -> &ResponseCache<IpRecord> {
        &self.cache
    }

    /// Look up the caller's own address
    pub async fn lookup_self(&self) -> Result<IpRecord, LookupError> {
        self.resolve(CacheKey::SelfLookup, None).await
    }

    /// Validate and look up an arbitrary address
    pub async fn trace(&self, input: &str) -> Result<IpRecord, LookupError> {
        let ip = validate_trace_input(input)?;
        self.resolve(CacheKey::Trace(ip.clone()), Some(&ip)).await
    }

    async fn resolve(&self, key: CacheKey, ip: Option<&str>) -> Result<IpRecord, LookupError> {
        let mut state = LookupState::Idle;

        loop {
            log::debug!("lookup {}: {}", key, state.name());

            state = match state {
                LookupState::Idle => LookupState::CacheCheck,

                LookupState::CacheCheck => match self.cache.get(key.as_str()) {
                    Some(record) => {
                        log::debug!("Using cached data for: {}", key);
                        LookupState::Render(record)
                    }
                    None => LookupState::PrimaryFetch { attempt: 1 },
                },

                LookupState::PrimaryFetch { attempt } => match self.fetch_primary(ip).await {
                    Ok(record) => LookupState::Success(record),
                    Err(e) if e.is_rate_limit() => LookupState::RateLimited,
                    Err(e) if attempt < self.config.max_primary_attempts => {
                        log::info!("primary API attempt {} for {} failed: {}", attempt, key, e);
                        LookupState::Retry { attempt }
                    }
                    Err(e) => {
                        log::warn!("Primary API failed for {}, trying fallback: {}", key, e);
                        LookupState::FallbackFetch
                    }
                },

                LookupState::Retry { attempt } => {
                    tokio::time::sleep(self.config.retry_delay).await;
                    LookupState::PrimaryFetch {
                        attempt: attempt + 1,
                    }
                }

                LookupState::RateLimited => {
                    log::warn!("Rate limited on primary API, trying fallback for {}", key);
                    LookupState::FallbackFetch
                }

                LookupState::FallbackFetch => match self.fetch_fallback(ip).await {
                    Ok(record) => LookupState::Success(record),
                    Err(e) => {
                        log::error!("Fallback API also failed for {}: {}", key, e);
                        LookupState::Error
                    }
                },

                LookupState::Success(record) => {
                    self.cache.set(key.as_str(), record.clone());
                    LookupState::Render(record)
                }

                LookupState::Render(record) => return Ok(record),

                LookupState::Error => return Err(LookupError::AllAttemptsFailed),
            };
        }
    }

    async fn fetch_primary(&self, ip: Option<&str>) -> Result<IpRecord, FetchError> {
        let url = self.endpoints.primary_url(ip);
        let response = self
            .fetcher
            .get(&url, self.config.request_timeout)
            .await?;

        if response.status == 429 {
            return Err(FetchError::RateLimited);
        }
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        decode_primary(&response.body)
    }

    async fn fetch_fallback(&self, ip: Option<&str>) -> Result<IpRecord, FetchError> {
        let url = self.endpoints.fallback_url(ip);
        let response = self
            .fetcher
            .get(&url, self.config.request_timeout)
            .await?;

        // ip-api.com reports failures in a 200 body, so decode whenever possible
        match decode_fallback(&response.body) {
            Ok(record) => Ok(record),
            Err(_) if !response.is_success() => Err(FetchError::Status(response.status)),
            Err(e) => Err(e),
        }
    }
}
