//! In-memory session store with bounded size.
//!
//! Records live in a `moka` cache. Each entry expires at its record's own
//! expiry date, and the cache never holds more than its capacity; the least
//! useful sessions are evicted first once it is full.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tower_sessions::{
    SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};

/// Session store backed by a capacity-bounded `moka` cache.
#[derive(Debug, Clone)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Create a store holding at most `capacity` sessions.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .expire_after(RecordExpiry)
                .build(),
        }
    }

    /// Number of sessions currently held, including ones not yet swept.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending evictions and expirations now.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Expires each cache entry at its record's expiry date.
struct RecordExpiry;

impl RecordExpiry {
    fn time_to_live(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc())
            .unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::time_to_live(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::time_to_live(record))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time;

    use super::*;

    fn record(id: i128, ttl: time::Duration) -> Record {
        Record {
            id: Id(id),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MokaSessionStore::new(10);
        let record = record(1, time::Duration::minutes(30));

        store.save(&record).await.unwrap();
        assert_eq!(store.load(&record.id).await.unwrap(), Some(record.clone()));

        store.delete(&record.id).await.unwrap();
        assert_eq!(store.load(&record.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let store = MokaSessionStore::new(10_000);
        for id in 0..1000 {
            store
                .save(&record(id, time::Duration::seconds(-1)))
                .await
                .unwrap();
        }

        assert_eq!(store.load(&Id(7)).await.unwrap(), None);

        store.run_pending_tasks().await;
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_capacity_bounds_live_sessions() {
        let store = MokaSessionStore::new(50);
        for id in 0..1000 {
            store
                .save(&record(id, time::Duration::days(7)))
                .await
                .unwrap();
        }

        store.run_pending_tasks().await;
        assert!(store.entry_count() <= 50);
    }

    #[tokio::test]
    async fn test_save_extends_expiry() {
        let store = MokaSessionStore::new(10);
        store
            .save(&record(1, time::Duration::seconds(-1)))
            .await
            .unwrap();
        store
            .save(&record(1, time::Duration::minutes(30)))
            .await
            .unwrap();

        store.run_pending_tasks().await;
        assert!(store.load(&Id(1)).await.unwrap().is_some());
    }
}
