//! Persisted single-value documents: side-sets, id maps, preferences.
//!
//! The membership relation between the local user and an entity is tracked in
//! these side documents rather than on the entity itself; services mutate the
//! side document and the entity counter inside the same operation so the two
//! never drift.

use crate::model::entity::EntityId;
use crate::store::{KvStorage, StorageKey};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One persisted JSON value with save-through semantics.
pub struct DocumentCell<'s, T> {
    storage: &'s dyn KvStorage,
    key: StorageKey,
    value: T,
    degraded: bool,
}

impl<'s, T: Serialize + DeserializeOwned + Default> DocumentCell<'s, T> {
    /// Hydrates the document at `key`; absent or undecodable payloads start
    /// from `T::default()`, which is written back on the first mutation.
    pub fn load_or_default(storage: &'s dyn KvStorage, key: StorageKey) -> Self {
        let mut cell = Self {
            storage,
            key,
            value: T::default(),
            degraded: false,
        };

        match cell.storage.get(&cell.key) {
            Ok(Some(payload)) => match serde_json::from_str::<T>(&payload) {
                Ok(value) => cell.value = value,
                Err(err) => warn!(
                    "event=document_reset module=repo status=ok key={} error={err}",
                    cell.key
                ),
            },
            Ok(None) => {}
            Err(err) => {
                warn!(
                    "event=document_load module=repo status=degraded key={} error={err}",
                    cell.key
                );
                cell.degraded = true;
            }
        }

        cell
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Applies a mutation and persists the new value immediately.
    pub fn mutate<R>(&mut self, apply: impl FnOnce(&mut T) -> R) -> R {
        let result = apply(&mut self.value);
        self.persist();
        result
    }

    /// Clears the durable copy and resets the in-memory value.
    pub fn clear(&mut self) {
        self.value = T::default();
        if let Err(err) = self.storage.remove(&self.key) {
            warn!(
                "event=document_save module=repo status=degraded key={} error={err}",
                self.key
            );
            self.degraded = true;
        }
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=document_save module=repo status=degraded key={} error={err}",
                    self.key
                );
                self.degraded = true;
                return;
            }
        };

        if let Err(err) = self.storage.put(&self.key, &payload) {
            warn!(
                "event=document_save module=repo status=degraded key={} error={err}",
                self.key
            );
            self.degraded = true;
        }
    }
}

/// Persisted set of entity ids (liked posts, applied postings, and similar).
pub struct IdSet<'s> {
    cell: DocumentCell<'s, BTreeSet<EntityId>>,
}

impl<'s> IdSet<'s> {
    pub fn load(storage: &'s dyn KvStorage, key: StorageKey) -> Self {
        Self {
            cell: DocumentCell::load_or_default(storage, key),
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.cell.get().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }

    pub fn insert(&mut self, id: EntityId) -> bool {
        self.cell.mutate(|set| set.insert(id))
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        self.cell.mutate(|set| set.remove(&id))
    }

    /// Flips membership; returns whether `id` is a member afterwards.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        self.cell.mutate(|set| {
            if set.remove(&id) {
                false
            } else {
                set.insert(id);
                true
            }
        })
    }
}

/// Persisted id-to-id map (team id to local membership record id).
pub struct IdMap<'s> {
    cell: DocumentCell<'s, BTreeMap<EntityId, EntityId>>,
}

impl<'s> IdMap<'s> {
    pub fn load(storage: &'s dyn KvStorage, key: StorageKey) -> Self {
        Self {
            cell: DocumentCell::load_or_default(storage, key),
        }
    }

    pub fn get(&self, key: EntityId) -> Option<EntityId> {
        self.cell.get().get(&key).copied()
    }

    pub fn contains(&self, key: EntityId) -> bool {
        self.cell.get().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }

    /// Next value id: `max(existing values) + 1`, 1 when empty.
    pub fn allocate_value(&self) -> EntityId {
        self.cell
            .get()
            .values()
            .copied()
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn insert(&mut self, key: EntityId, value: EntityId) {
        self.cell.mutate(|map| {
            map.insert(key, value);
        });
    }
}
