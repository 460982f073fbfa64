//! Club recruitment use-case service.
//!
//! # Responsibility
//! - Project postings through urgency/search filters and the recency sort.
//! - Own the application lifecycle and the applied-id side set.
//! - Gate posting edits and deletes to the organizer.
//!
//! # Invariants
//! - `apply_to` is idempotent; a second call changes nothing.
//! - `filled <= count` holds for every position after any mutation.
//! - The applied-id set and the posting's application counter move together.

use crate::model::entity::LocalProfile;
use crate::model::recruitment::{ApplicationStatus, ApplyControl, Position, Recruitment};
use crate::repo::{CollectionRepository, DocumentCell, EntityId, IdSet};
use crate::seed;
use crate::service::{ensure_owner, validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{ListQuery, RecencyRankTable, SortOrder};
use std::collections::BTreeMap;

const RECRUIT_TIME_LABELS: &[&str] = &["刚刚", "1小时前", "3小时前", "昨天", "2天前"];

/// Form input for a new posting.
#[derive(Debug, Clone)]
pub struct NewRecruitment {
    pub club: String,
    pub title: String,
    pub description: String,
    pub urgent: bool,
    pub positions: Vec<Position>,
}

/// Recruitment facade over the postings collection and application state.
pub struct RecruitmentService<'s> {
    postings: CollectionRepository<'s, Recruitment>,
    applied: IdSet<'s>,
    statuses: DocumentCell<'s, BTreeMap<EntityId, ApplicationStatus>>,
    profile: LocalProfile,
    pending_delete: PendingDelete,
    rank_table: RecencyRankTable,
}

impl<'s> RecruitmentService<'s> {
    pub fn open(storage: &'s dyn KvStorage, profile: LocalProfile) -> Self {
        Self::open_with_seed(storage, profile, seed::recruitments())
    }

    pub fn open_with_seed(
        storage: &'s dyn KvStorage,
        profile: LocalProfile,
        seed: Vec<Recruitment>,
    ) -> Self {
        Self {
            postings: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("recruitment", "postings"),
                seed,
            ),
            applied: IdSet::load(storage, StorageKey::new("recruitment", "applied_ids")),
            statuses: DocumentCell::load_or_default(
                storage,
                StorageKey::new("recruitment", "application_status"),
            ),
            profile,
            pending_delete: PendingDelete::default(),
            rank_table: RecencyRankTable::from_labels(RECRUIT_TIME_LABELS),
        }
    }

    pub fn postings(&self) -> &[Recruitment] {
        self.postings.all()
    }

    pub fn get(&self, id: EntityId) -> Option<&Recruitment> {
        self.postings.get(id)
    }

    pub fn list(&self, urgent_only: bool, search: &str, order: SortOrder) -> Vec<Recruitment> {
        let query = ListQuery::new()
            .filter(move |posting: &Recruitment| !urgent_only || posting.urgent)
            .search(search, |posting: &Recruitment| vec![posting.title.clone()])
            .sort_by(|a: &Recruitment, b: &Recruitment| {
                self.rank_table.compare_desc(&a.time_label, &b.time_label)
            })
            .order(order);
        query.apply(self.postings.all())
    }

    pub fn create_posting(&mut self, form: NewRecruitment) -> ServiceResult<Recruitment> {
        validate_required(&[
            ("club", &form.club),
            ("title", &form.title),
            ("description", &form.description),
        ])?;
        for position in &form.positions {
            position.validate()?;
        }

        let posting = Recruitment {
            id: self.postings.next_id(),
            club: form.club,
            title: form.title,
            description: form.description,
            organizer: self.profile.display_name.clone(),
            urgent: form.urgent,
            positions: form.positions,
            applications: 0,
            time_label: "刚刚".to_string(),
        };
        self.postings.insert(posting.clone());
        Ok(posting)
    }

    // ── application lifecycle ───────────────────────────────────────────

    pub fn status(&self, id: EntityId) -> ApplicationStatus {
        self.statuses.get().get(&id).copied().unwrap_or_default()
    }

    /// The apply control the UI renders for this posting.
    pub fn control(&self, id: EntityId) -> ApplyControl {
        self.status(id).control()
    }

    pub fn has_applied(&self, id: EntityId) -> bool {
        self.applied.contains(id)
    }

    /// Files an application. Idempotent: once the posting is in the applied
    /// set (or past `NotApplied`), the call is a no-op returning the current
    /// state.
    pub fn apply_to(&mut self, id: EntityId) -> ServiceResult<ApplicationStatus> {
        if self.postings.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        let current = self.status(id);
        if !current.can_apply() || self.applied.contains(id) {
            return Ok(current);
        }

        self.applied.insert(id);
        self.statuses.mutate(|statuses| {
            statuses.insert(id, ApplicationStatus::PendingReview);
        });
        self.postings
            .update(id, |posting| posting.applications += 1)?;
        Ok(ApplicationStatus::PendingReview)
    }

    /// Organizer decision on a pending application. Approval fills the first
    /// position with a vacancy.
    pub fn review_application(&mut self, id: EntityId, approve: bool) -> ServiceResult<ApplicationStatus> {
        let posting = self.postings.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(posting.organizer.as_str()), &self.profile, id)?;
        if self.status(id) != ApplicationStatus::PendingReview {
            return Err(ServiceError::InvalidTransition(
                "only pending applications can be reviewed",
            ));
        }

        let decided = if approve {
            let vacancy = posting
                .positions
                .iter()
                .position(|position| position.filled < position.count);
            let Some(index) = vacancy else {
                return Err(ServiceError::InvalidTransition("no open position left"));
            };
            self.postings.update(id, |posting| {
                posting.positions[index].filled += 1;
            })?;
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        };

        self.statuses.mutate(|statuses| {
            statuses.insert(id, decided);
        });
        Ok(decided)
    }

    // ── organizer edits ─────────────────────────────────────────────────

    /// Replaces the position table after a manual edit; rejects overfill.
    pub fn update_positions(
        &mut self,
        id: EntityId,
        positions: Vec<Position>,
    ) -> ServiceResult<()> {
        let posting = self.postings.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(posting.organizer.as_str()), &self.profile, id)?;
        for position in &positions {
            position.validate()?;
        }

        self.postings.update(id, |posting| {
            posting.positions = positions;
        })?;
        Ok(())
    }

    pub fn update_posting(
        &mut self,
        id: EntityId,
        title: Option<String>,
        description: Option<String>,
        urgent: Option<bool>,
    ) -> ServiceResult<()> {
        let posting = self.postings.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(posting.organizer.as_str()), &self.profile, id)?;

        self.postings.update(id, |posting| {
            if let Some(title) = title {
                posting.title = title;
            }
            if let Some(description) = description {
                posting.description = description;
            }
            if let Some(urgent) = urgent {
                posting.urgent = urgent;
            }
        })?;
        Ok(())
    }

    pub fn request_delete(&mut self, id: EntityId) -> ServiceResult<()> {
        let posting = self.postings.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(posting.organizer.as_str()), &self.profile, id)?;
        self.pending_delete.request(id);
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> ServiceResult<Recruitment> {
        let id = self.pending_delete.confirm()?;
        Ok(self.postings.remove(id)?)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }
}
