//! Training-center admin records.
//!
//! This module set (courses, branches, trainers, trainees, schedule) is
//! unrelated to the campus forum but ships inside the same shell; it shares
//! the collection store and view model with everything else.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCourse {
    pub id: EntityId,
    pub name: String,
    pub duration_label: String,
    pub fee_label: String,
}

impl Entity for TrainingCourse {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: EntityId,
    pub name: String,
    pub city: String,
}

impl Entity for Branch {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: EntityId,
    pub name: String,
    pub specialty: String,
    pub branch_id: EntityId,
}

impl Entity for Trainer {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainee {
    pub id: EntityId,
    pub name: String,
    pub course_id: EntityId,
    pub branch_id: EntityId,
}

impl Entity for Trainee {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Schedule slot linking a course, a trainer and a branch.
///
/// `slot_label` is a display string (e.g. `周二 19:00-21:00`); slots are
/// compared by exact label equality for the double-booking check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntityId,
    pub course_id: EntityId,
    pub trainer_id: EntityId,
    pub branch_id: EntityId,
    pub slot_label: String,
}

impl Entity for ScheduleEntry {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Fixed analytics display snapshot.
///
/// Analytics computation is out of scope; the dashboard renders this constant
/// mock shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_trainees: u32,
    pub active_courses: u32,
    pub monthly_signups: Vec<MonthlySignups>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySignups {
    pub month_label: String,
    pub signups: u32,
}
