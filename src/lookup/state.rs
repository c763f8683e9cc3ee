//! States of a single lookup

use crate::record::IpRecord;

/// Position of a lookup in the fetch state machine
///
/// ```text
/// Idle -> CacheCheck -> PrimaryFetch -> Success | RateLimited | Retry | FallbackFetch
///                  \                                                   -> Render | Error
///                   `-> Render (cache hit)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    /// Nothing started
    Idle,
    /// Consulting the cache
    CacheCheck,
    /// Querying the primary API
    PrimaryFetch {
        /// 1-based attempt number
        attempt: u8,
    },
    /// Primary answered 429
    RateLimited,
    /// Waiting before the next primary attempt
    Retry {
        /// Attempt that just failed
        attempt: u8,
    },
    /// Querying the fallback API
    FallbackFetch,
    /// A record was obtained from the network
    Success(IpRecord),
    /// Record ready for display
    Render(IpRecord),
    /// Every source failed
    Error,
}

impl LookupState {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            LookupState::Idle => "IDLE",
            LookupState::CacheCheck => "CACHE_CHECK",
            LookupState::PrimaryFetch { .. } => "PRIMARY_FETCH",
            LookupState::RateLimited => "RATE_LIMITED",
            LookupState::Retry { .. } => "RETRY",
            LookupState::FallbackFetch => "FALLBACK_FETCH",
            LookupState::Success(_) => "SUCCESS",
            LookupState::Render(_) => "RENDER",
            LookupState::Error => "ERROR",
        }
    }

    /// Whether the state machine stops here
    pub fn is_terminal(&self) -> bool {
        matches!(self, LookupState::Render(_) | LookupState::Error)
    }
}
