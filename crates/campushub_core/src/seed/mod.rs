//! Bundled seed documents.
//!
//! # Responsibility
//! - Ship the first-run data for every collection as compile-time JSON.
//! - Decode seeds into typed records for repository hydration.
//!
//! # Invariants
//! - Seeds are written to storage once per key; later runs read storage.
//! - Seed `time_label` values appear in the owning module's rank table.

use crate::model::academic::{Course, Material, TechPost};
use crate::model::admin::{Branch, ScheduleEntry, Trainee, Trainer, TrainingCourse};
use crate::model::chat::Conversation;
use crate::model::feed::FeedPost;
use crate::model::life::LifePost;
use crate::model::recruitment::Recruitment;
use crate::model::team::TeamPost;
use serde::Deserialize;

const FEED_POSTS_JSON: &str = include_str!("data/feed_posts.json");
const COURSES_JSON: &str = include_str!("data/courses.json");
const MATERIALS_JSON: &str = include_str!("data/materials.json");
const TECH_POSTS_JSON: &str = include_str!("data/tech_posts.json");
const RECRUITMENTS_JSON: &str = include_str!("data/recruitments.json");
const TEAMS_JSON: &str = include_str!("data/teams.json");
const LIFE_POSTS_JSON: &str = include_str!("data/life_posts.json");
const CONVERSATIONS_JSON: &str = include_str!("data/conversations.json");
const ADMIN_JSON: &str = include_str!("data/admin.json");

pub fn feed_posts() -> Vec<FeedPost> {
    serde_json::from_str(FEED_POSTS_JSON).expect("bundled feed seed is valid JSON")
}

pub fn courses() -> Vec<Course> {
    serde_json::from_str(COURSES_JSON).expect("bundled course seed is valid JSON")
}

pub fn materials() -> Vec<Material> {
    serde_json::from_str(MATERIALS_JSON).expect("bundled material seed is valid JSON")
}

pub fn tech_posts() -> Vec<TechPost> {
    serde_json::from_str(TECH_POSTS_JSON).expect("bundled tech post seed is valid JSON")
}

pub fn recruitments() -> Vec<Recruitment> {
    serde_json::from_str(RECRUITMENTS_JSON).expect("bundled recruitment seed is valid JSON")
}

pub fn teams() -> Vec<TeamPost> {
    serde_json::from_str(TEAMS_JSON).expect("bundled team seed is valid JSON")
}

pub fn life_posts() -> Vec<LifePost> {
    serde_json::from_str(LIFE_POSTS_JSON).expect("bundled life seed is valid JSON")
}

pub fn conversations() -> Vec<Conversation> {
    serde_json::from_str(CONVERSATIONS_JSON).expect("bundled chat seed is valid JSON")
}

/// Composite seed for the training-admin module.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub courses: Vec<TrainingCourse>,
    pub branches: Vec<Branch>,
    pub trainers: Vec<Trainer>,
    pub trainees: Vec<Trainee>,
    pub schedule: Vec<ScheduleEntry>,
}

pub fn admin() -> AdminSeed {
    serde_json::from_str(ADMIN_JSON).expect("bundled admin seed is valid JSON")
}
