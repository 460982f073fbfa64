//! Shared entity contract for persisted collections.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Stable numeric identifier for collection entities.
///
/// New ids are allocated as `max(existing) + 1`; comment and chat-message ids
/// are epoch milliseconds, which still satisfy the strictly-increasing
/// contract within their collections.
pub type EntityId = i64;

/// Contract every persisted collection record implements.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> EntityId;

    /// Display name of the record's owner, for creator-only affordances.
    ///
    /// This is a plain string comparison against the local profile name, not
    /// an authorization boundary; the system has no real identity.
    fn owner(&self) -> Option<&str> {
        None
    }
}

/// The single implicit local user.
///
/// There is no login and no multi-user state; the profile exists so services
/// can take the current display name as an injected value instead of reading
/// a hard-coded constant at every ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalProfile {
    pub display_name: String,
}

impl LocalProfile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

impl Default for LocalProfile {
    fn default() -> Self {
        Self::new("同学小陈")
    }
}
