//! Typed collection access over a raw backend
//!
//! A [`Collection`] binds a record type to a fixed key. Loading parses the
//! blob as a JSON array and deserializes element by element: records that no
//! longer match the schema are quarantined (dropped with a warning) rather
//! than poisoning the whole collection or being passed through unchecked.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// Typed view of one whole-collection blob
#[derive(Debug, Clone)]
pub struct Collection<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a record type to `key` on the given backend
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _record: PhantomData,
        }
    }

    /// Collection key on the backend
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load all records; a never-written key loads as the empty collection
    ///
    /// Malformed elements are quarantined: logged with their index and
    /// skipped, so one bad record cannot take the rest of the collection
    /// down with it.
    ///
    /// # Errors
    /// Returns `StoreError::Malformed` when the blob itself is not a JSON
    /// array, and propagates backend errors.
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&blob).map_err(|e| StoreError::Malformed {
                key: self.key.clone(),
                detail: e.to_string(),
            })?;

        let mut records = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(key = %self.key, index, error = %e, "quarantined malformed record");
                }
            }
        }
        Ok(records)
    }

    /// Replace the whole collection
    ///
    /// # Errors
    /// Returns `StoreError::Serialize` when the records cannot be encoded,
    /// and propagates backend errors.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(records).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, &blob)
    }

    /// Drop the collection entirely; absent collections are a no-op
    ///
    /// # Errors
    /// Propagates backend errors.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    fn collection() -> Collection<Record> {
        Collection::new(Arc::new(MemoryStore::new()), "records")
    }

    #[test]
    fn missing_key_loads_empty() {
        assert!(collection().load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_records() {
        let coll = collection();
        let records = vec![
            Record {
                name: "a".to_string(),
                count: 1,
            },
            Record {
                name: "b".to_string(),
                count: 2,
            },
        ];
        coll.save(&records).unwrap();
        assert_eq!(coll.load().unwrap(), records);
    }

    #[test]
    fn malformed_element_is_quarantined() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "records",
                r#"[{"name":"ok","count":1},{"name":"bad"},{"name":"ok2","count":2}]"#,
            )
            .unwrap();

        let coll: Collection<Record> = Collection::new(store, "records");
        let loaded = coll.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "ok");
        assert_eq!(loaded[1].name, "ok2");
    }

    #[test]
    fn non_array_blob_is_malformed() {
        let store = Arc::new(MemoryStore::new());
        store.set("records", r#"{"name":"ok"}"#).unwrap();

        let coll: Collection<Record> = Collection::new(store, "records");
        assert!(matches!(
            coll.load(),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn clear_is_idempotent() {
        let coll = collection();
        coll.save(&[Record {
            name: "a".to_string(),
            count: 1,
        }])
        .unwrap();
        coll.clear().unwrap();
        coll.clear().unwrap();
        assert!(coll.load().unwrap().is_empty());
    }
}
