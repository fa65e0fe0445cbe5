//! In-memory record storage for the resource server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;

use super::pagination::Pageable;
use crate::entity::{Entity, EntityId};

/// Thread-safe map of records keyed by id, with a sequence for new ids.
pub struct InMemoryRepository<E> {
    records: RwLock<BTreeMap<EntityId, E>>,
    sequence: AtomicI64,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record under the next id and return it.
    pub fn insert(&self, mut record: E) -> E {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        record.set_id(id);
        self.records.write().insert(id, record.clone());
        record
    }

    pub fn find(&self, id: EntityId) -> Option<E> {
        self.records.read().get(&id).cloned()
    }

    pub fn exists(&self, id: EntityId) -> bool {
        self.records.read().contains_key(&id)
    }

    /// Replace an existing record. Returns `None` if the id is unknown.
    pub fn replace(&self, id: EntityId, record: E) -> Option<E> {
        let mut records = self.records.write();
        let slot = records.get_mut(&id)?;
        *slot = record;
        Some(slot.clone())
    }

    /// Merge the set fields of `patch` into an existing record.
    pub fn patch(&self, id: EntityId, patch: E) -> Option<E> {
        let mut records = self.records.write();
        let slot = records.get_mut(&id)?;
        slot.merge_patch(patch);
        Some(slot.clone())
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, id: EntityId) -> bool {
        self.records.write().remove(&id).is_some()
    }

    /// One sorted page plus the total record count.
    pub fn find_page(&self, pageable: &Pageable) -> (Vec<E>, u64) {
        let records = self.records.read();
        let total = records.len() as u64;

        if pageable.sort.is_empty() {
            let page = records
                .values()
                .skip(pageable.offset())
                .take(pageable.size as usize)
                .cloned()
                .collect();
            return (page, total);
        }

        let mut keyed: Vec<(serde_json::Value, &E)> = records
            .values()
            .map(|record| (serde_json::to_value(record).unwrap_or_default(), record))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| pageable.compare(a, b));

        let page = keyed
            .into_iter()
            .skip(pageable.offset())
            .take(pageable.size as usize)
            .map(|(_, record)| record.clone())
            .collect();
        (page, total)
    }
}
