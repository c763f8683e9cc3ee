//! Lookup configuration with compile-time defaults and runtime overrides
//!
//! Default values are compile-time constants. They can be overridden per
//! lookup through [`LookupConfigBuilder`], and the API base URLs can also
//! be redirected through environment variables (useful for pointing the
//! CLI at a local test server).

use crate::provider::{FallbackProvider, DEFAULT_PRIMARY_BASE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default delay before retrying the primary API in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Default cache time-to-live in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Default number of primary attempts before falling back
pub const DEFAULT_MAX_PRIMARY_ATTEMPTS: u8 = 2;
/// Default local clock refresh period in milliseconds
pub const DEFAULT_CLOCK_TICK_MS: u64 = 1_000;

/// Environment variable overriding the primary API base URL
pub const PRIMARY_URL_ENV: &str = "GEOTRACE_PRIMARY_URL";
/// Environment variable overriding the fallback API base URL
pub const FALLBACK_URL_ENV: &str = "GEOTRACE_FALLBACK_URL";

/// Configuration for lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the primary API (default: https://ipapi.co)
    pub primary_base: String,
    /// Which fallback API to use
    pub fallback: FallbackProvider,
    /// Base URL override for the fallback API
    pub fallback_base: Option<String>,
    /// Timeout for each request (default: 10s)
    pub request_timeout: Duration,
    /// Delay before the primary retry (default: 1s)
    pub retry_delay: Duration,
    /// Primary attempts before falling back (default: 2)
    pub max_primary_attempts: u8,
    /// Lifetime of cached records (default: 5 minutes)
    pub cache_ttl: Duration,
    /// User agent sent with requests
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            primary_base: DEFAULT_PRIMARY_BASE.to_string(),
            fallback: FallbackProvider::default(),
            fallback_base: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_primary_attempts: DEFAULT_MAX_PRIMARY_ATTEMPTS,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            user_agent: crate::client_info::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LookupConfig {
    /// Create a new LookupConfig builder
    pub fn builder() -> LookupConfigBuilder {
        LookupConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.primary_base.is_empty() {
            return Err("primary API URL must not be empty".to_string());
        }
        if self.request_timeout.as_millis() == 0 {
            return Err("request_timeout must be greater than 0".to_string());
        }
        if self.max_primary_attempts < 1 {
            return Err("max_primary_attempts must be at least 1".to_string());
        }
        if self.cache_ttl.is_zero() {
            return Err("cache_ttl must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Builder for LookupConfig
pub struct LookupConfigBuilder {
    config: LookupConfig,
}

impl LookupConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LookupConfig::default(),
        }
    }

    /// Set the primary API base URL
    pub fn primary_base(mut self, url: impl Into<String>) -> Self {
        self.config.primary_base = url.into();
        self
    }

    /// Select the fallback API
    pub fn fallback(mut self, provider: FallbackProvider) -> Self {
        self.config.fallback = provider;
        self
    }

    /// Override the fallback API base URL
    pub fn fallback_base(mut self, url: impl Into<String>) -> Self {
        self.config.fallback_base = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the delay before retrying the primary API
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the number of primary attempts
    pub fn max_primary_attempts(mut self, attempts: u8) -> Self {
        self.config.max_primary_attempts = attempts;
        self
    }

    /// Set the cache time-to-live
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Apply `GEOTRACE_PRIMARY_URL` / `GEOTRACE_FALLBACK_URL` when set
    pub fn env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(PRIMARY_URL_ENV) {
            if !url.is_empty() {
                self.config.primary_base = url;
            }
        }
        if let Ok(url) = std::env::var(FALLBACK_URL_ENV) {
            if !url.is_empty() {
                self.config.fallback_base = Some(url);
            }
        }
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<LookupConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for LookupConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LookupConfig::default();
        assert_eq!(config.primary_base, "https://ipapi.co");
        assert_eq!(config.fallback, FallbackProvider::IpapiCo);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.max_primary_attempts, 2);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = LookupConfig::builder()
            .primary_base("http://127.0.0.1:9000")
            .fallback(FallbackProvider::IpApiCom)
            .fallback_base("http://127.0.0.1:9001")
            .request_timeout(Duration::from_millis(500))
            .retry_delay(Duration::from_millis(10))
            .max_primary_attempts(3)
            .cache_ttl(Duration::from_secs(60))
            .user_agent("test/1.0")
            .build()
            .expect("valid config");

        assert_eq!(config.primary_base, "http://127.0.0.1:9000");
        assert_eq!(config.fallback, FallbackProvider::IpApiCom);
        assert_eq!(config.fallback_base.as_deref(), Some("http://127.0.0.1:9001"));
        assert_eq!(config.request_timeout, Duration::from_millis(500));
        assert_eq!(config.max_primary_attempts, 3);
        assert_eq!(config.user_agent, "test/1.0");
    }

    #[test]
    fn test_validation_errors() {
        assert!(LookupConfig::builder()
            .request_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(LookupConfig::builder()
            .max_primary_attempts(0)
            .build()
            .is_err());
        assert!(LookupConfig::builder().primary_base("").build().is_err());
        assert!(LookupConfig::builder()
            .cache_ttl(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn test_timing_values_reasonable() {
        assert!(DEFAULT_RETRY_DELAY_MS < DEFAULT_REQUEST_TIMEOUT_MS);
        assert!(DEFAULT_MAX_PRIMARY_ATTEMPTS >= 1);
        assert!(DEFAULT_CLOCK_TICK_MS > 0);
    }
}
