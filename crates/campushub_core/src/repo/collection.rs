//! Generic persisted collection repository.
//!
//! # Responsibility
//! - Hydrate one entity collection from its storage key, seeding on first run.
//! - Persist the whole collection on every mutation.
//! - Allocate new entity ids as `max(existing) + 1`.
//!
//! # Invariants
//! - The in-memory vector is the authority; storage is a best-effort mirror.
//! - A payload that no longer decodes is replaced by the seed, never trusted.

use crate::model::entity::{Entity, EntityId};
use crate::repo::{RepoError, RepoResult};
use crate::store::{KvStorage, StorageKey};
use log::{info, warn};

/// One persisted, insertion-ordered entity collection.
pub struct CollectionRepository<'s, T: Entity> {
    storage: &'s dyn KvStorage,
    key: StorageKey,
    items: Vec<T>,
    degraded: bool,
}

impl<'s, T: Entity> CollectionRepository<'s, T> {
    /// Hydrates the collection at `key`, writing `seed` when the key is
    /// absent (first run) or its payload no longer decodes.
    ///
    /// A storage read failure does not fail construction: the repository
    /// starts from the seed and operates in memory only.
    pub fn load_or_seed(storage: &'s dyn KvStorage, key: StorageKey, seed: Vec<T>) -> Self {
        let mut repo = Self {
            storage,
            key,
            items: Vec::new(),
            degraded: false,
        };

        match repo.storage.get(&repo.key) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<T>>(&payload) {
                Ok(items) => repo.items = items,
                Err(err) => {
                    warn!(
                        "event=collection_reseeded module=repo status=ok key={} error={err}",
                        repo.key
                    );
                    repo.items = seed;
                    repo.persist();
                }
            },
            Ok(None) => {
                info!(
                    "event=collection_seeded module=repo status=ok key={} count={}",
                    repo.key,
                    seed.len()
                );
                repo.items = seed;
                repo.persist();
            }
            Err(err) => {
                warn!(
                    "event=collection_load module=repo status=degraded key={} error={err}",
                    repo.key
                );
                repo.items = seed;
                repo.degraded = true;
            }
        }

        repo
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a storage failure has forced in-memory-only operation.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Next id: strictly greater than every existing id, 1 when empty.
    pub fn next_id(&self) -> EntityId {
        self.items
            .iter()
            .map(Entity::id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.persist();
    }

    pub fn update(&mut self, id: EntityId, apply: impl FnOnce(&mut T)) -> RepoResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(RepoError::NotFound(id))?;
        apply(item);
        self.persist();
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> RepoResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(RepoError::NotFound(id))?;
        let removed = self.items.remove(index);
        self.persist();
        Ok(removed)
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=collection_save module=repo status=degraded key={} error={err}",
                    self.key
                );
                self.degraded = true;
                return;
            }
        };

        if let Err(err) = self.storage.put(&self.key, &payload) {
            warn!(
                "event=collection_save module=repo status=degraded key={} error={err}",
                self.key
            );
            self.degraded = true;
        }
    }
}
