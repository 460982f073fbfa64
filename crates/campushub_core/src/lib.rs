//! Core engine for the campus hub shell.
//! This crate owns every piece of state, mutation and navigation decision
//! the UI renders; rendering itself lives outside.

pub mod logging;
pub mod model;
pub mod nav;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{Entity, EntityId, LocalProfile};
pub use nav::{
    Arrival, CoreEvent, ElementRef, EventBus, ModuleId, NavigationBridge, NavigationIntent,
    ScrollDirective,
};
pub use repo::{CollectionRepository, DocumentCell, IdMap, IdSet, RepoError, RepoResult};
pub use service::{
    academic_service::AcademicService, admin_service::AdminService, chat_service::ChatService,
    feed_service::FeedService, life_service::LifeService,
    recruitment_service::RecruitmentService, team_service::TeamService, ServiceError,
    ServiceResult,
};
pub use store::{
    open_store, open_store_in_memory, KvStorage, MemoryKvStorage, SqliteKvStorage, StorageKey,
};
pub use view::{heat_score, page, ListQuery, RecencyRankTable, SortOrder, SortPreference};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
