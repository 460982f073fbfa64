//! Training-center admin use-case service.
//!
//! Shares the collection store and view model with the forum modules but is
//! otherwise an independent CRUD surface: courses, branches, trainers,
//! trainees and the schedule. Analytics is a fixed display snapshot.

use crate::model::admin::{
    AnalyticsSnapshot, Branch, MonthlySignups, ScheduleEntry, Trainee, Trainer, TrainingCourse,
};
use crate::repo::{CollectionRepository, EntityId};
use crate::seed;
use crate::service::{validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::ListQuery;

/// Form input for a new trainee registration.
#[derive(Debug, Clone)]
pub struct NewTrainee {
    pub name: String,
    pub course_id: EntityId,
    pub branch_id: EntityId,
}

/// Form input for a new schedule slot.
#[derive(Debug, Clone)]
pub struct NewScheduleEntry {
    pub course_id: EntityId,
    pub trainer_id: EntityId,
    pub branch_id: EntityId,
    pub slot_label: String,
}

/// Admin facade over the five training collections.
pub struct AdminService<'s> {
    courses: CollectionRepository<'s, TrainingCourse>,
    branches: CollectionRepository<'s, Branch>,
    trainers: CollectionRepository<'s, Trainer>,
    trainees: CollectionRepository<'s, Trainee>,
    schedule: CollectionRepository<'s, ScheduleEntry>,
    pending_delete: PendingDelete,
}

impl<'s> AdminService<'s> {
    pub fn open(storage: &'s dyn KvStorage) -> Self {
        let seed = seed::admin();
        Self {
            courses: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("admin", "courses"),
                seed.courses,
            ),
            branches: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("admin", "branches"),
                seed.branches,
            ),
            trainers: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("admin", "trainers"),
                seed.trainers,
            ),
            trainees: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("admin", "trainees"),
                seed.trainees,
            ),
            schedule: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("admin", "schedule"),
                seed.schedule,
            ),
            pending_delete: PendingDelete::default(),
        }
    }

    // ── courses ─────────────────────────────────────────────────────────

    pub fn list_courses(&self, search: &str) -> Vec<TrainingCourse> {
        ListQuery::new()
            .search(search, |course: &TrainingCourse| vec![course.name.clone()])
            .apply(self.courses.all())
    }

    pub fn create_course(
        &mut self,
        name: impl Into<String>,
        duration_label: impl Into<String>,
        fee_label: impl Into<String>,
    ) -> ServiceResult<TrainingCourse> {
        let name = name.into();
        validate_required(&[("name", &name)])?;

        let course = TrainingCourse {
            id: self.courses.next_id(),
            name,
            duration_label: duration_label.into(),
            fee_label: fee_label.into(),
        };
        self.courses.insert(course.clone());
        Ok(course)
    }

    // ── branches / trainers ─────────────────────────────────────────────

    pub fn branches(&self) -> &[Branch] {
        self.branches.all()
    }

    pub fn list_trainers(&self, branch_id: Option<EntityId>, search: &str) -> Vec<Trainer> {
        ListQuery::new()
            .filter(move |trainer: &Trainer| {
                branch_id.map_or(true, |wanted| trainer.branch_id == wanted)
            })
            .search(search, |trainer: &Trainer| {
                vec![trainer.name.clone(), trainer.specialty.clone()]
            })
            .apply(self.trainers.all())
    }

    // ── trainees ────────────────────────────────────────────────────────

    pub fn list_trainees(
        &self,
        course_id: Option<EntityId>,
        branch_id: Option<EntityId>,
        search: &str,
    ) -> Vec<Trainee> {
        ListQuery::new()
            .filter(move |trainee: &Trainee| {
                course_id.map_or(true, |wanted| trainee.course_id == wanted)
            })
            .filter(move |trainee: &Trainee| {
                branch_id.map_or(true, |wanted| trainee.branch_id == wanted)
            })
            .search(search, |trainee: &Trainee| vec![trainee.name.clone()])
            .apply(self.trainees.all())
    }

    pub fn register_trainee(&mut self, form: NewTrainee) -> ServiceResult<Trainee> {
        validate_required(&[("name", &form.name)])?;
        if self.courses.get(form.course_id).is_none() {
            return Err(ServiceError::NotFound(form.course_id));
        }
        if self.branches.get(form.branch_id).is_none() {
            return Err(ServiceError::NotFound(form.branch_id));
        }

        let trainee = Trainee {
            id: self.trainees.next_id(),
            name: form.name,
            course_id: form.course_id,
            branch_id: form.branch_id,
        };
        self.trainees.insert(trainee.clone());
        Ok(trainee)
    }

    pub fn request_delete_trainee(&mut self, id: EntityId) -> ServiceResult<()> {
        if self.trainees.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }
        self.pending_delete.request(id);
        Ok(())
    }

    pub fn confirm_delete_trainee(&mut self) -> ServiceResult<Trainee> {
        let id = self.pending_delete.confirm()?;
        Ok(self.trainees.remove(id)?)
    }

    pub fn cancel_delete_trainee(&mut self) {
        self.pending_delete.cancel();
    }

    // ── schedule ────────────────────────────────────────────────────────

    pub fn schedule(&self) -> &[ScheduleEntry] {
        self.schedule.all()
    }

    /// Adds a slot after referential and double-booking checks: the same
    /// trainer or the same branch cannot hold two entries with one slot
    /// label.
    pub fn add_schedule_entry(&mut self, form: NewScheduleEntry) -> ServiceResult<ScheduleEntry> {
        validate_required(&[("slot", &form.slot_label)])?;
        if self.courses.get(form.course_id).is_none() {
            return Err(ServiceError::NotFound(form.course_id));
        }
        if self.trainers.get(form.trainer_id).is_none() {
            return Err(ServiceError::NotFound(form.trainer_id));
        }
        if self.branches.get(form.branch_id).is_none() {
            return Err(ServiceError::NotFound(form.branch_id));
        }

        let double_booked = self.schedule.all().iter().any(|entry| {
            entry.slot_label == form.slot_label
                && (entry.trainer_id == form.trainer_id || entry.branch_id == form.branch_id)
        });
        if double_booked {
            return Err(ServiceError::ScheduleConflict {
                slot_label: form.slot_label,
            });
        }

        let entry = ScheduleEntry {
            id: self.schedule.next_id(),
            course_id: form.course_id,
            trainer_id: form.trainer_id,
            branch_id: form.branch_id,
            slot_label: form.slot_label,
        };
        self.schedule.insert(entry.clone());
        Ok(entry)
    }

    pub fn remove_schedule_entry(&mut self, id: EntityId) -> ServiceResult<ScheduleEntry> {
        Ok(self.schedule.remove(id)?)
    }

    // ── analytics ───────────────────────────────────────────────────────

    /// Fixed dashboard snapshot; analytics computation is out of scope.
    pub fn analytics(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            total_trainees: 128,
            active_courses: 6,
            monthly_signups: vec![
                MonthlySignups {
                    month_label: "4月".to_string(),
                    signups: 18,
                },
                MonthlySignups {
                    month_label: "5月".to_string(),
                    signups: 24,
                },
                MonthlySignups {
                    month_label: "6月".to_string(),
                    signups: 31,
                },
            ],
        }
    }
}
