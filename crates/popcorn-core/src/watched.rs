use popcorn_models::WatchedRecord;
use tracing::{debug, info};
use crate::persistent::{PersistentList, StoreError};
use crate::stats::{compute_stats, WatchedStats};

/// Ordered, id-unique list of watched titles, written through to storage on
/// every change.
pub struct WatchedListStore {
    list: PersistentList<WatchedRecord>,
    key: String,
    records: Vec<WatchedRecord>,
}

impl WatchedListStore {
    /// Hydrate from storage. A missing or corrupt value starts an empty list.
    pub fn open(list: PersistentList<WatchedRecord>, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut records = list.load(&key);

        // Lists written by other clients may repeat an id; keep the first one
        let before = records.len();
        let mut seen = std::collections::HashSet::new();
        records.retain(|r| seen.insert(r.id.clone()));
        if records.len() != before {
            debug!("Dropped {} duplicate watched records while loading", before - records.len());
        }

        info!("Loaded watched list: {} records", records.len());
        Self { list, key, records }
    }

    /// Append `record` unless its id is already present.
    ///
    /// Returns `Ok(false)` for a duplicate; nothing is written in that case.
    pub fn add(&mut self, record: WatchedRecord) -> Result<bool, StoreError> {
        if self.contains(&record.id) {
            debug!("{} is already in the watched list, ignoring add", record.id);
            return Ok(false);
        }

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove the record with `id`. Returns `Ok(false)` if there was none.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        if !self.contains(id) {
            return Ok(false);
        }

        let next: Vec<WatchedRecord> = self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    // Persist first so memory never runs ahead of storage
    fn commit(&mut self, next: Vec<WatchedRecord>) -> Result<(), StoreError> {
        self.list.save(&self.key, &next)?;
        self.records = next;
        debug!("Persisted watched list: {} records", self.records.len());
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn rating_for(&self, id: &str) -> Option<u8> {
        self.records.iter().find(|r| r.id == id).map(|r| r.user_rating)
    }

    pub fn records(&self) -> &[WatchedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> WatchedStats {
        compute_stats(&self.records)
    }
}
