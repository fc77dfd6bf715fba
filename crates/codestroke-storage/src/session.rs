use jiff::{SignedDuration, Timestamp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::kv::KvStore;

/// Bump when the envelope or payload shape changes incompatibly. Older
/// records are discarded rather than migrated; they are disposable.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Two hours.
pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_secs(2 * 60 * 60);

/// A payload stamped with its write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot<T> {
    pub version: u32,
    pub written_at: Timestamp,
    pub data: T,
}

#[derive(Serialize)]
struct SnapshotRef<'a, T> {
    version: u32,
    written_at: Timestamp,
    data: &'a T,
}

/// Typed, expiring view over one key of a [`KvStore`].
pub struct SessionStore<S: KvStore> {
    store: S,
    key: String,
    ttl: SignedDuration,
}

impl<S: KvStore> SessionStore<S> {
    pub fn new(store: S, key: impl Into<String>, ttl: SignedDuration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load the snapshot if one exists, parses, matches the current
    /// version, and is no older than the TTL. Anything else is treated as
    /// absent and the stale record is removed. Never fails.
    pub fn load<T: DeserializeOwned>(&mut self, now: Timestamp) -> Option<SessionSnapshot<T>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no session record");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "session record unreadable, starting fresh");
                return None;
            }
        };

        let snapshot: SessionSnapshot<T> = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(key = %self.key, error = %e, "discarding corrupt session record");
                self.discard();
                return None;
            }
        };

        if snapshot.version != SNAPSHOT_VERSION {
            debug!(
                key = %self.key,
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "discarding session record from another version"
            );
            self.discard();
            return None;
        }

        if is_expired(snapshot.written_at, now, self.ttl) {
            debug!(key = %self.key, written_at = %snapshot.written_at, "discarding expired session record");
            self.discard();
            return None;
        }

        Some(snapshot)
    }

    /// Serialize `data` stamped with `now` and overwrite the record.
    pub fn save<T: Serialize>(&mut self, data: &T, now: Timestamp) -> Result<(), StorageError> {
        let envelope = SnapshotRef {
            version: SNAPSHOT_VERSION,
            written_at: now,
            data,
        };
        let json = serde_json::to_string(&envelope)?;
        self.store.set(&self.key, &json)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    fn discard(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to remove stale session record");
        }
    }
}

/// Strictly older than the TTL. A write time in the future (clock moved
/// back) counts as fresh.
pub fn is_expired(written_at: Timestamp, now: Timestamp, ttl: SignedDuration) -> bool {
    let age_ms = i128::from(now.as_millisecond()) - i128::from(written_at.as_millisecond());
    age_ms > ttl.as_millis()
}
