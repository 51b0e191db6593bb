//! Persisted timer records and the store abstraction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionKey;
use crate::error::StorageError;

/// What survives a close/reopen for one session key.
///
/// Field names follow the browser storage layout; the short `seconds` /
/// `total` spellings of older records are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    #[serde(alias = "seconds")]
    pub remaining_seconds: u64,
    #[serde(alias = "total")]
    pub total_seconds: u64,
    pub updated_at: DateTime<Utc>,
}

impl TimerRecord {
    /// A record whose remaining time exceeds its total cannot have come
    /// from a running timer.
    pub fn is_consistent(&self) -> bool {
        self.remaining_seconds <= self.total_seconds
    }

    pub fn to_json(&self, key: &SessionKey) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
    }

    pub fn from_json(key: &SessionKey, json: &str) -> Result<Self, StorageError> {
        serde_json::from_str(json).map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
    }
}

/// Durable key-value storage for timer records, one record per key.
pub trait TimerStore {
    fn load(&self, key: &SessionKey) -> Result<Option<TimerRecord>, StorageError>;
    fn save(&self, key: &SessionKey, record: &TimerRecord) -> Result<(), StorageError>;
    fn remove(&self, key: &SessionKey) -> Result<(), StorageError>;
}

impl<T: TimerStore + ?Sized> TimerStore for Box<T> {
    fn load(&self, key: &SessionKey) -> Result<Option<TimerRecord>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &SessionKey, record: &TimerRecord) -> Result<(), StorageError> {
        (**self).save(key, record)
    }

    fn remove(&self, key: &SessionKey) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_records<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> Result<R, StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        Ok(f(&mut records))
    }
}

impl TimerStore for MemoryStore {
    fn load(&self, key: &SessionKey) -> Result<Option<TimerRecord>, StorageError> {
        let json = self.with_records(|r| r.get(key.storage_key()).cloned())?;
        json.map(|j| TimerRecord::from_json(key, &j)).transpose()
    }

    fn save(&self, key: &SessionKey, record: &TimerRecord) -> Result<(), StorageError> {
        let json = record.to_json(key)?;
        self.with_records(|r| {
            r.insert(key.storage_key().to_string(), json);
        })
    }

    fn remove(&self, key: &SessionKey) -> Result<(), StorageError> {
        self.with_records(|r| {
            r.remove(key.storage_key());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_field_names() {
        let key = SessionKey::from_label("old");
        let rec = TimerRecord::from_json(
            &key,
            r#"{"seconds": 30, "total": 60, "updatedAt": "2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(rec.remaining_seconds, 30);
        assert_eq!(rec.total_seconds, 60);
    }

    #[test]
    fn writes_camel_case() {
        let key = SessionKey::from_label("new");
        let rec = TimerRecord {
            remaining_seconds: 1,
            total_seconds: 2,
            updated_at: Utc::now(),
        };
        let json = rec.to_json(&key).unwrap();
        assert!(json.contains("\"remainingSeconds\":1"));
        assert!(json.contains("\"totalSeconds\":2"));
    }

    #[test]
    fn garbage_is_malformed() {
        let key = SessionKey::from_label("bad");
        assert!(matches!(
            TimerRecord::from_json(&key, "not json"),
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn memory_store_shares_between_clones() {
        let store = MemoryStore::new();
        let other = store.clone();
        let key = SessionKey::from_label("x");
        let rec = TimerRecord {
            remaining_seconds: 5,
            total_seconds: 10,
            updated_at: Utc::now(),
        };
        store.save(&key, &rec).unwrap();
        assert_eq!(other.load(&key).unwrap(), Some(rec));
        other.remove(&key).unwrap();
        assert!(store.is_empty());
    }
}
