//! Error types for lookups

use thiserror::Error;

/// Input rejected before any network activity
///
/// These are user-facing and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing was entered
    #[error("Please enter an IP address")]
    Empty,

    /// Neither a valid IPv4 nor IPv6 address
    #[error("Please enter a valid IPv4 (e.g., 8.8.8.8) or IPv6 address")]
    InvalidFormat,

    /// Address falls in a private or reserved block
    #[error("Cannot trace {range} address. This IP is not publicly routable.")]
    PrivateAddress {
        /// Display name of the matching range
        range: &'static str,
    },
}

/// Failure of a single API request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the timeout
    #[error("Request timed out")]
    Timeout,

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered with HTTP 429
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The API reported an error in an otherwise valid response
    #[error("{0}")]
    Api(String),
}

impl FetchError {
    /// Whether this failure should skip the retry and go straight to the fallback
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }
}

/// Errors that leave the lookup orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Input was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Primary attempts and the fallback all failed
    #[error("All API attempts failed")]
    AllAttemptsFailed,
}
