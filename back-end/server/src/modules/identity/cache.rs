//! Verified-credential cache with TTL expiration.
//!
//! Bearer credentials are keyed by their SHA-256 digest so raw tokens are
//! never held in memory longer than the request that carried them. Time is
//! read from an injected [`Clock`].

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use sha2::{Digest, Sha256};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.origin + offset
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    email: String,
    inserted_at: Instant,
}

/// LRU cache from credential digest to verified email.
///
/// Access needs external synchronization.
pub struct TokenCache {
    cache: LruCache<String, CacheEntry>,
    ttl: Duration,
    hits: u64,
    misses: u64,
}

impl TokenCache {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: LruCache::new(cap),
            ttl,
            hits: 0,
            misses: 0,
        }
    }

    /// Expired entries count as a miss and are dropped.
    pub fn get(&mut self, token: &str, now: Instant) -> Option<String> {
        let key = token_key(token);

        if let Some(entry) = self.cache.get(&key) {
            if now.saturating_duration_since(entry.inserted_at) < self.ttl {
                self.hits += 1;
                return Some(entry.email.clone());
            }
            self.cache.pop(&key);
        }

        self.misses += 1;
        None
    }

    pub fn insert(&mut self, token: &str, email: String, now: Instant) {
        let entry = CacheEntry {
            email,
            inserted_at: now,
        };
        self.cache.put(token_key(token), entry);
    }

    /// Includes expired entries that have not been looked up since.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

pub fn token_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}
