//! Domain records for every campus hub module.
//!
//! # Responsibility
//! - Define the collection entity shapes persisted as JSON documents.
//! - Keep per-record validation next to the data it guards.
//!
//! # Invariants
//! - Every record carries a stable numeric `id`, unique within its collection.
//! - Deletion is physical removal from the collection; there are no tombstones.

pub mod academic;
pub mod admin;
pub mod chat;
pub mod entity;
pub mod feed;
pub mod life;
pub mod recruitment;
pub mod team;
