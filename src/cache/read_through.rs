//! Read-Through Cache
//!
//! Memoizes handler responses under `handler:lat:lon` keys, coordinates rounded
//! to one decimal place (about 11 km), for a fixed TTL.

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheStats};
use crate::error::Result;
use crate::models::Location;
use crate::shaper::round_to;

// == Key Derivation ==
/// Rounds a coordinate to one decimal place, folding `-0.0` into `0.0`.
/// Ties follow [`round_to`].
pub fn round_coordinate(value: f64) -> f64 {
    let rounded = round_to(value, 1);
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Builds the cache key for a handler at a location.
pub fn cache_key(handler: &str, location: &Location) -> String {
    format!(
        "{}:{:.1}:{:.1}",
        handler,
        round_coordinate(location.latitude),
        round_coordinate(location.longitude)
    )
}

// == Cached Json ==
/// Serialized JSON body produced by the read-through cache.
///
/// A hit carries the exact text stored on the miss that created the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedJson {
    pub body: String,
    pub hit: bool,
}

impl IntoResponse for CachedJson {
    fn into_response(self) -> Response {
        let status = if self.hit { "HIT" } else { "MISS" };
        (
            [
                (header::CONTENT_TYPE, "application/json"),
                (HeaderName::from_static("x-cache"), status),
            ],
            self.body,
        )
            .into_response()
    }
}

// == Read-Through Cache ==
/// Wraps handlers with a TTL read-through cache.
///
/// Every handler is a closure returning a future; synchronous handlers hand
/// back `std::future::ready(..)`. Store failures fail open: the handler runs
/// and its result is served without being cached. Handler errors are never
/// stored.
#[derive(Clone)]
pub struct ReadThroughCache {
    backend: Arc<dyn CacheBackend>,
    ttl_seconds: u64,
}

impl ReadThroughCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_seconds: u64) -> Self {
        Self {
            backend,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub async fn stats(&self) -> CacheStats {
        self.backend.stats().await
    }

    /// Serves `handler`'s cached payload for `location`, or runs `compute` and
    /// caches what it returns.
    ///
    /// No single-flight: concurrent misses on one key each run `compute`, and
    /// the last write wins.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        handler: &str,
        location: Location,
        compute: F,
    ) -> Result<CachedJson>
    where
        T: Serialize,
        F: FnOnce(Location) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = cache_key(handler, &location);

        match self.backend.get(&key).await {
            Ok(Some(body)) => {
                debug!(key = %key, "cache hit");
                return Ok(CachedJson { body, hit: true });
            }
            Ok(None) => debug!(key = %key, "cache miss"),
            Err(err) => warn!(key = %key, error = %err, "cache lookup failed, bypassing cache"),
        }

        let result = compute(location).await?;
        let body = serde_json::to_string(&result)?;

        if let Err(err) = self
            .backend
            .set_ex(&key, body.clone(), self.ttl_seconds)
            .await
        {
            warn!(key = %key, error = %err, "cache store failed, serving uncached");
        }

        Ok(CachedJson { body, hit: false })
    }
}
