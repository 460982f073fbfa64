//! Persistence layer over the keyed JSON store.
//!
//! # Responsibility
//! - Load, cache and save whole collections as JSON documents.
//! - Keep storage failures invisible to callers: log and continue in memory.
//!
//! # Invariants
//! - Every mutation persists immediately; there is no debounce or batching.
//! - A storage failure never fails the mutation that triggered it.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod document;

pub use collection::CollectionRepository;
pub use document::{DocumentCell, IdMap, IdSet};

pub use crate::model::entity::EntityId;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and lookup errors surfaced to services.
///
/// Save failures are intentionally absent: the storage-failure policy is to
/// degrade to in-memory state, not to surface an error.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    NotFound(EntityId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
