//! Navigation bridge: deep-link intents across module remounts.
//!
//! # Responsibility
//! - Turn a post click into one `NavigationIntent` and fan it out: bus
//!   events for mounted consumers, a fragment slot for the shell, and a
//!   durable one-shot flag that survives a full remount.
//! - Resolve the intent on destination mount into a scroll directive.
//!
//! # Invariants
//! - The durable flag and the fragment are written and cleared only here.
//! - An intent fires at most once; suppression also consumes it.
//! - The highlight window is exactly [`HIGHLIGHT_DURATION_MS`] long.

use crate::nav::events::{CoreEvent, EventBus};
use crate::nav::{ElementRef, ElementRefError, ModuleId};
use crate::repo::DocumentCell;
use crate::store::{KvStorage, StorageKey};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Highlight class lifetime on the target element.
pub const HIGHLIGHT_DURATION_MS: i64 = 2000;

/// Fixed settle delay before scrolling, so layout can finish after mount.
pub const SCROLL_SETTLE_DELAY_MS: i64 = 100;

/// How the user reached the destination module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Followed a deep link dispatched through the bridge.
    DeepLink,
    /// Ordinary sidebar click; auto-scroll is suppressed.
    SidebarClick,
}

/// The one logical cross-module navigation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub module: ModuleId,
    pub element_id: String,
    pub one_shot: bool,
    pub token: Uuid,
}

/// Instruction for the shell: scroll the element into view centered, apply
/// the highlight class at `highlight_from_ms`, remove it at
/// `highlight_until_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollDirective {
    pub element_id: String,
    pub highlight_from_ms: i64,
    pub highlight_until_ms: i64,
}

impl ScrollDirective {
    pub fn highlight_duration_ms(&self) -> i64 {
        self.highlight_until_ms - self.highlight_from_ms
    }
}

/// Durable one-shot navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PendingNavigation {
    module: ModuleId,
    element_id: String,
    token: Uuid,
}

/// Owner of every navigation channel: bus, fragment slot, durable flag,
/// visited-modules set.
pub struct NavigationBridge<'s> {
    bus: EventBus,
    pending: DocumentCell<'s, Option<PendingNavigation>>,
    visited: DocumentCell<'s, BTreeSet<ModuleId>>,
    fragment: Option<String>,
}

impl<'s> NavigationBridge<'s> {
    pub fn open(storage: &'s dyn KvStorage) -> Self {
        Self {
            bus: EventBus::new(),
            pending: DocumentCell::load_or_default(storage, StorageKey::new("nav", "pending_target")),
            visited: DocumentCell::load_or_default(
                storage,
                StorageKey::new("nav", "visited_modules"),
            ),
            fragment: None,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// The element id currently carried in the URL fragment, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Whether a durable intent is waiting for `module` to mount.
    pub fn has_pending_for(&self, module: ModuleId) -> bool {
        self.pending
            .get()
            .as_ref()
            .is_some_and(|pending| pending.module == module)
    }

    /// Dispatches a post click into its destination module.
    ///
    /// Writes the durable one-shot flag and the fragment, then publishes the
    /// module-change request and the post-click event for already-mounted
    /// consumers. `snapshot` is the clicked entity serialized as JSON.
    pub fn dispatch_post_click(
        &mut self,
        element_id: &str,
        snapshot: String,
    ) -> Result<NavigationIntent, ElementRefError> {
        let target = ElementRef::parse(element_id)?;
        let token = Uuid::new_v4();

        self.pending.mutate(|slot| {
            *slot = Some(PendingNavigation {
                module: target.module,
                element_id: element_id.to_string(),
                token,
            });
        });
        self.fragment = Some(element_id.to_string());

        self.bus.publish(&CoreEvent::ModuleChangeRequested {
            module: target.module,
        });
        self.bus.publish(&CoreEvent::PostClicked {
            module: target.module,
            element_id: element_id.to_string(),
            snapshot,
        });

        info!(
            "event=nav_dispatch module=nav status=ok target_module={} element_id={element_id} token={token}",
            target.module
        );

        Ok(NavigationIntent {
            module: target.module,
            element_id: element_id.to_string(),
            one_shot: true,
            token,
        })
    }

    /// Resolves a pending intent when `module` mounts.
    ///
    /// Checks the fragment first, then the durable flag. Suppresses (and
    /// still consumes) the intent on sidebar arrival and on the module's
    /// first-ever visit. A missing element logs a warning and consumes the
    /// intent with no retry.
    pub fn on_module_mount(
        &mut self,
        module: ModuleId,
        arrival: Arrival,
        now_ms: i64,
        element_present: impl Fn(&str) -> bool,
    ) -> Option<ScrollDirective> {
        let first_visit = !self.visited.get().contains(&module);
        if first_visit {
            self.visited.mutate(|set| {
                set.insert(module);
            });
        }

        let from_fragment = self
            .fragment
            .as_deref()
            .filter(|raw| {
                ElementRef::parse(raw)
                    .map(|parsed| parsed.module == module)
                    .unwrap_or(false)
            })
            .map(str::to_string);
        let target = from_fragment.or_else(|| {
            self.pending
                .get()
                .as_ref()
                .filter(|pending| pending.module == module)
                .map(|pending| pending.element_id.clone())
        })?;

        self.consume_target(&target);

        if arrival == Arrival::SidebarClick || first_visit {
            let reason = if arrival == Arrival::SidebarClick {
                "sidebar_click"
            } else {
                "first_visit"
            };
            info!(
                "event=nav_scroll_suppressed module=nav status=ok target_module={module} element_id={target} reason={reason}"
            );
            return None;
        }

        if !element_present(&target) {
            warn!(
                "event=nav_target_missing module=nav status=ok target_module={module} element_id={target}"
            );
            return None;
        }

        let highlight_from_ms = now_ms + SCROLL_SETTLE_DELAY_MS;
        Some(ScrollDirective {
            element_id: target,
            highlight_from_ms,
            highlight_until_ms: highlight_from_ms + HIGHLIGHT_DURATION_MS,
        })
    }

    fn consume_target(&mut self, element_id: &str) {
        if self.fragment.as_deref() == Some(element_id) {
            self.fragment = None;
        }
        let matches = self
            .pending
            .get()
            .as_ref()
            .is_some_and(|pending| pending.element_id == element_id);
        if matches {
            self.pending.clear();
        }
    }
}
