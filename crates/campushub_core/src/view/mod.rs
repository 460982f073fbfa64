//! List view models: the filtered/sorted projection of a collection.
//!
//! # Responsibility
//! - Provide the single generic filter/search/sort pipeline every module
//!   renders through.
//! - Own the recency rank tables and the heat-score comparator inputs.
//!
//! # Invariants
//! - Projections are recomputed on demand and never persisted.
//! - Ascending order is the exact reverse of the descending result.

pub mod list;

pub use list::{heat_score, page, ListQuery, RecencyRankTable, SortOrder, SortPreference};
