//! Rate limiting middleware using actix-governor.
//!
//! Applied to the token endpoints to slow down brute-force attempts against
//! authorization codes and refresh tokens. Uses the Governor algorithm with
//! a per-IP rate limit.

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

/// Type alias for the rate limiter configuration.
pub type RateLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Type alias for the rate limiter.
pub type RateLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Creates a rate limiter configured for 10 requests per minute per IP.
///
/// Each IP address has its own token bucket that refills at a rate of one
/// token every 6 seconds, with burst capacity for legitimate traffic.
pub fn create_rate_limiter() -> RateLimiter {
    let config: RateLimiterConfig = GovernorConfigBuilder::default()
        .per_second(6) // 1 request every 6 seconds = 10 per minute
        .burst_size(10)
        .finish()
        .expect("Failed to build rate limiter configuration");

    Governor::new(&config)
}

/// Creates a more permissive rate limiter for development/testing.
#[allow(dead_code)]
pub fn create_dev_rate_limiter() -> RateLimiter {
    let config: RateLimiterConfig = GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(60)
        .finish()
        .expect("Failed to build rate limiter configuration");

    Governor::new(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rate_limiter() {
        let _limiter = create_rate_limiter();
    }

    #[test]
    fn test_create_dev_rate_limiter() {
        let _limiter = create_dev_rate_limiter();
    }
}
