//! Cross-module navigation: module identity, element addressing, the
//! in-process event bus and the navigation bridge.
//!
//! # Responsibility
//! - Define the module and element id vocabulary shared by deep links.
//! - Carry one logical navigation intent across independently mounted
//!   modules through a single owner (the bridge).
//!
//! # Invariants
//! - Element ids follow `<module-prefix>[-<tab>]-<numeric id>`.
//! - A durable navigation intent fires at most once.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bridge;
pub mod events;

pub use bridge::{
    Arrival, NavigationBridge, NavigationIntent, ScrollDirective, HIGHLIGHT_DURATION_MS,
    SCROLL_SETTLE_DELAY_MS,
};
pub use events::{CoreEvent, EventBus, EventBusError, EventSubscriber};

/// Top-level modules the sidebar can switch between.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleId {
    Home,
    AcademicResources,
    Recruitment,
    TeamCenter,
    LifeSharing,
    Chat,
    TrainingAdmin,
}

impl ModuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::AcademicResources => "academic-resources",
            Self::Recruitment => "recruitment",
            Self::TeamCenter => "team-center",
            Self::LifeSharing => "life-sharing",
            Self::Chat => "chat",
            Self::TrainingAdmin => "training-admin",
        }
    }

    /// Element-id prefix owned by this module.
    pub fn element_prefix(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::AcademicResources => "academic",
            Self::Recruitment => "recruit",
            Self::TeamCenter => "team",
            Self::LifeSharing => "life",
            Self::Chat => "chat",
            Self::TrainingAdmin => "admin",
        }
    }

    fn from_element_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "home" => Some(Self::Home),
            "academic" => Some(Self::AcademicResources),
            "recruit" => Some(Self::Recruitment),
            "team" => Some(Self::TeamCenter),
            "life" => Some(Self::LifeSharing),
            "chat" => Some(Self::Chat),
            "admin" => Some(Self::TrainingAdmin),
            _ => None,
        }
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed deep-link element id.
///
/// `academic-tech-7` resolves to the academic-resources module, tab `tech`,
/// entity 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub module: ModuleId,
    pub tab: Option<String>,
    pub entity_id: i64,
    pub raw: String,
}

impl ElementRef {
    pub fn parse(raw: &str) -> Result<Self, ElementRefError> {
        let segments: Vec<&str> = raw.split('-').collect();
        if segments.len() < 2 {
            return Err(ElementRefError::Malformed(raw.to_string()));
        }

        let entity_id: i64 = segments[segments.len() - 1]
            .parse()
            .map_err(|_| ElementRefError::Malformed(raw.to_string()))?;
        let module = ModuleId::from_element_prefix(segments[0])
            .ok_or_else(|| ElementRefError::UnknownPrefix(segments[0].to_string()))?;
        let tab = if segments.len() > 2 {
            Some(segments[1..segments.len() - 1].join("-"))
        } else {
            None
        };

        Ok(Self {
            module,
            tab,
            entity_id,
            raw: raw.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRefError {
    Malformed(String),
    UnknownPrefix(String),
}

impl Display for ElementRefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(raw) => write!(f, "malformed element id `{raw}`"),
            Self::UnknownPrefix(prefix) => write!(f, "unknown element prefix `{prefix}`"),
        }
    }
}

impl Error for ElementRefError {}

#[cfg(test)]
mod tests {
    use super::{ElementRef, ElementRefError, ModuleId};

    #[test]
    fn parses_tabbed_element_id() {
        let parsed = ElementRef::parse("academic-tech-7").unwrap();
        assert_eq!(parsed.module, ModuleId::AcademicResources);
        assert_eq!(parsed.tab.as_deref(), Some("tech"));
        assert_eq!(parsed.entity_id, 7);
        assert_eq!(parsed.module.as_str(), "academic-resources");
    }

    #[test]
    fn parses_untabbed_element_id() {
        let parsed = ElementRef::parse("life-3").unwrap();
        assert_eq!(parsed.module, ModuleId::LifeSharing);
        assert_eq!(parsed.tab, None);
        assert_eq!(parsed.entity_id, 3);
    }

    #[test]
    fn rejects_unknown_prefix_and_garbage() {
        assert_eq!(
            ElementRef::parse("hospital-9"),
            Err(ElementRefError::UnknownPrefix("hospital".to_string()))
        );
        assert!(matches!(
            ElementRef::parse("academic-tech-x"),
            Err(ElementRefError::Malformed(_))
        ));
        assert!(matches!(
            ElementRef::parse("solo"),
            Err(ElementRefError::Malformed(_))
        ));
    }
}
