//! Cache Entry Module
//!
//! A stored JSON payload together with its expiry deadline.

use std::time::{Duration, Instant};

use super::MAX_TTL_SECONDS;

// == Cache Entry ==
/// Serialized handler output plus the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized JSON text, returned verbatim on a hit
    pub payload: String,
    /// When the entry stops being served
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` from now. TTLs beyond
    /// [`MAX_TTL_SECONDS`] are capped.
    pub fn new(payload: String, ttl_seconds: u64) -> Self {
        let now = Instant::now();
        let ttl = Duration::from_secs(ttl_seconds.min(MAX_TTL_SECONDS));
        Self {
            payload,
            expires_at: now.checked_add(ttl).unwrap_or(now),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current instant reaches its deadline, so a
    /// zero TTL never produces a hit.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_fresh_after_creation() {
        let entry = CacheEntry::new(r#"{"illumination":12.35}"#.to_string(), 60);

        assert_eq!(entry.payload, r#"{"illumination":12.35}"#);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("{}".to_string(), 1);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new("{}".to_string(), 0);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining_bounds() {
        let entry = CacheEntry::new("{}".to_string(), 10);

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_huge_ttl_is_capped() {
        let entry = CacheEntry::new("{}".to_string(), u64::MAX);

        assert!(!entry.is_expired());
        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(MAX_TTL_SECONDS));
        assert!(remaining >= Duration::from_secs(MAX_TTL_SECONDS - 1));
    }
}
