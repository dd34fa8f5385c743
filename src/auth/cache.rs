// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Aarvee CRM

//! Thread-safe holder of the current key snapshot.
//!
//! The cache owns exactly one [`KeySnapshot`] at a time. A refresh builds a
//! brand-new snapshot and swaps it in whole; readers that already hold the
//! previous `Arc` keep using it, so no reader ever observes a partially
//! populated key set. There is no merge: a `kid` absent from the new
//! document becomes unresolvable even if it was cached before.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::keys::VerificationKey;

/// Default freshness window, matching the provider's expected rotation
/// cadence.
pub const DEFAULT_KEYS_TTL: Duration = Duration::from_secs(3600);

/// The atomic, immutable cache state: `kid` to key bindings plus the time
/// they were fetched.
#[derive(Debug)]
pub struct KeySnapshot {
    keys: HashMap<String, Arc<VerificationKey>>,
    fetched_at: Instant,
}

impl KeySnapshot {
    /// Build a snapshot from parsed keys, stamped now.
    pub fn new(keys: HashMap<String, Arc<VerificationKey>>) -> Self {
        Self {
            keys,
            fetched_at: Instant::now(),
        }
    }

    pub fn get(&self, kid: &str) -> Option<&Arc<VerificationKey>> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Holder of the current snapshot, with a constructor-injected TTL.
///
/// The only mutation is [`KeyCache::replace`], a pointer swap under a brief
/// write lock. Lookups never touch the network.
pub struct KeyCache {
    snapshot: RwLock<Option<Arc<KeySnapshot>>>,
    ttl: Duration,
}

impl KeyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: RwLock::new(None),
            ttl,
        }
    }

    /// Resolve a `kid` against the current snapshot. Pure read.
    pub fn lookup(&self, kid: &str) -> Option<Arc<VerificationKey>> {
        let guard = self.snapshot.read().expect("key cache lock poisoned");
        guard.as_ref().and_then(|snap| snap.get(kid).cloned())
    }

    /// True when no snapshot exists or the current one has outlived the TTL.
    pub fn is_stale(&self) -> bool {
        let guard = self.snapshot.read().expect("key cache lock poisoned");
        match guard.as_ref() {
            Some(snap) => snap.age() >= self.ttl,
            None => true,
        }
    }

    /// Atomically install a new snapshot, discarding the old one.
    pub fn replace(&self, snapshot: Arc<KeySnapshot>) {
        let mut guard = self.snapshot.write().expect("key cache lock poisoned");
        *guard = Some(snapshot);
    }

    /// Number of resolvable keys in the current snapshot.
    pub fn key_count(&self) -> usize {
        let guard = self.snapshot.read().expect("key cache lock poisoned");
        guard.as_ref().map(|snap| snap.len()).unwrap_or(0)
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEYS_TTL)
    }
}
