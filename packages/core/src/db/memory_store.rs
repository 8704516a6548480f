//! In-memory SkillStore
//!
//! A complete `SkillStore` kept in process memory. It backs the test suite, the
//! benchmarks and the dev tools, and doubles as the reference for what a
//! persistence backend has to provide.
//!
//! Records keep insertion order, so `load_all` is deterministic. Every mutation
//! bumps `last_modified` to a strictly later instant than the previous one, even
//! when the injected clock has not moved.

use crate::clock::Clock;
use crate::db::{DatabaseError, SkillStore};
use crate::models::{SkillId, SkillRecord};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<SkillRecord>,
    last_modified: Option<DateTime<Utc>>,
    next_id: SkillId,
}

impl StoreState {
    fn touch(&mut self, now: DateTime<Utc>) {
        let stamp = match self.last_modified {
            Some(previous) if previous >= now => previous + Duration::microseconds(1),
            _ => now,
        };
        self.last_modified = Some(stamp);
    }

    fn position(&self, id: SkillId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// Skill records held in memory
pub struct InMemorySkillStore {
    state: RwLock<StoreState>,
    clock: Arc<dyn Clock>,
    load_count: AtomicUsize,
}

impl InMemorySkillStore {
    /// Create an empty store that has never been written
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_id: 1,
                ..StoreState::default()
            }),
            clock,
            load_count: AtomicUsize::new(0),
        }
    }

    /// Create a store pre-populated with `records`, stamped as modified now
    pub fn with_records(records: Vec<SkillRecord>, clock: Arc<dyn Clock>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let last_modified = if records.is_empty() {
            None
        } else {
            Some(clock.now())
        };
        Self {
            state: RwLock::new(StoreState {
                records,
                last_modified,
                next_id,
            }),
            clock,
            load_count: AtomicUsize::new(0),
        }
    }

    /// Create a store from a JSON array of records
    pub fn from_json(json: &str, clock: Arc<dyn Clock>) -> Result<Self, DatabaseError> {
        let records: Vec<SkillRecord> = serde_json::from_str(json)?;
        Ok(Self::with_records(records, clock))
    }

    /// Insert or replace a record by id
    pub async fn save(&self, record: SkillRecord) {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        match state.position(record.id) {
            Some(index) => state.records[index] = record,
            None => {
                state.next_id = state.next_id.max(record.id + 1);
                state.records.push(record);
            }
        }
        state.touch(now);
    }

    /// Set the soft-delete flag and return the updated record
    pub async fn soft_delete(&self, id: SkillId) -> Result<SkillRecord, DatabaseError> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let index = state.position(id).ok_or_else(|| DatabaseError::not_found(id))?;
        state.records[index].deleted = true;
        let record = state.records[index].clone();
        state.touch(now);
        Ok(record)
    }

    pub async fn get(&self, id: SkillId) -> Option<SkillRecord> {
        let state = self.state.read().await;
        state.position(id).map(|index| state.records[index].clone())
    }

    /// Number of times `load_all` was called
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SkillStore for InMemorySkillStore {
    async fn load_all(&self) -> anyhow::Result<Vec<SkillRecord>> {
        self.load_count.fetch_add(1, Ordering::AcqRel);
        Ok(self.state.read().await.records.clone())
    }

    async fn insert(&self, mut record: SkillRecord) -> anyhow::Result<SkillId> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        if record.id == 0 {
            record.id = state.next_id;
        } else if state.position(record.id).is_some() {
            return Err(DatabaseError::duplicate_id(record.id).into());
        }

        let id = record.id;
        state.next_id = state.next_id.max(id + 1);
        state.records.push(record);
        state.touch(now);

        tracing::debug!("Inserted skill {} into in-memory store", id);
        Ok(id)
    }

    async fn last_modified(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self.state.read().await.last_modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn new_store() -> (InMemorySkillStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (InMemorySkillStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_empty_store_was_never_modified() {
        let (store, _clock) = new_store();
        assert!(store.last_modified().await.unwrap().is_none());
        assert!(store.load_all().await.unwrap().is_empty());
        assert_eq!(store.load_count(), 1);
    }

    #[tokio::test]
    async fn test_insert_allocates_ids() {
        let (store, _clock) = new_store();

        let first = store.insert(SkillRecord::new(0, None, "root")).await.unwrap();
        let second = store.insert(SkillRecord::new(0, Some(first), "child")).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(store.get(2).await.unwrap().parent_id, Some(1));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let (store, _clock) = new_store();
        store.insert(SkillRecord::new(5, None, "root")).await.unwrap();

        let err = store.insert(SkillRecord::new(5, None, "again")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_mutations_strictly_increase_last_modified() {
        let (store, clock) = new_store();
        store.insert(SkillRecord::new(0, None, "root")).await.unwrap();
        let first = store.last_modified().await.unwrap().unwrap();

        // Clock has not moved, the stamp still has to.
        store.save(SkillRecord::new(1, None, "renamed")).await;
        let second = store.last_modified().await.unwrap().unwrap();
        assert!(second > first);

        clock.advance(Duration::seconds(10));
        store.soft_delete(1).await.unwrap();
        let third = store.last_modified().await.unwrap().unwrap();
        assert_eq!(third, clock.now());
    }

    #[tokio::test]
    async fn test_soft_delete_missing_record() {
        let (store, _clock) = new_store();
        let err = store.soft_delete(42).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { id: 42 }));
    }

    #[tokio::test]
    async fn test_from_json_keeps_order() {
        let clock = Arc::new(ManualClock::default());
        let store = InMemorySkillStore::from_json(
            r#"[{"id": 3, "parentId": 1, "title": "Java"}, {"id": 1, "title": "root"}]"#,
            clock,
        )
        .unwrap();

        let ids: Vec<SkillId> = store.load_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(store.insert(SkillRecord::new(0, Some(1), "Go")).await.unwrap(), 4);
    }
}
