//! Academic resources use-case service: courses, materials, tech posts.
//!
//! # Responsibility
//! - Project the three academic tabs through their filters and sorts.
//! - Own material uploads (validation + simulated progress) and downloads.
//! - Own the tech-post comment map and like relation.
//!
//! # Invariants
//! - Comment ids are epoch milliseconds, unique within a post's thread.
//! - Download and like counters never go below zero.

use crate::model::academic::{Comment, Course, Material, MaterialCategory, TechPost};
use crate::model::entity::LocalProfile;
use crate::repo::{CollectionRepository, DocumentCell, EntityId, IdSet};
use crate::seed;
use crate::service::feed_service::LikeState;
use crate::service::{ensure_owner, validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{ListQuery, RecencyRankTable, SortOrder, SortPreference};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Relative-time labels used by academic seed data, newest first.
const ACADEMIC_TIME_LABELS: &[&str] = &["刚刚", "1小时前", "3小时前", "昨天", "2天前"];

/// Fixed percentage step of the simulated upload progress bar.
const UPLOAD_TICK_STEP: u8 = 20;

/// Named material sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSort {
    Downloads,
    Latest,
}

/// Form input for a material upload.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub title: String,
    pub category: MaterialCategory,
    pub size_label: String,
}

/// Simulated upload progress: advances a fixed step per timer tick.
///
/// Pure UI decoration; no transfer happens behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadTicker {
    percent: u8,
}

impl UploadTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Advances one timer tick; clamps at 100.
    pub fn tick(&mut self) -> u8 {
        self.percent = (self.percent + UPLOAD_TICK_STEP).min(100);
        self.percent
    }

    pub fn is_done(&self) -> bool {
        self.percent >= 100
    }
}

/// Academic facade over the three tab collections and their side documents.
pub struct AcademicService<'s> {
    courses: CollectionRepository<'s, Course>,
    materials: CollectionRepository<'s, Material>,
    tech_posts: CollectionRepository<'s, TechPost>,
    comments: DocumentCell<'s, BTreeMap<EntityId, Vec<Comment>>>,
    liked_tech: IdSet<'s>,
    prefs: DocumentCell<'s, SortPreference>,
    profile: LocalProfile,
    pending_delete: PendingDelete,
    rank_table: RecencyRankTable,
}

impl<'s> AcademicService<'s> {
    pub fn open(storage: &'s dyn KvStorage, profile: LocalProfile) -> Self {
        Self::open_with_seeds(
            storage,
            profile,
            seed::courses(),
            seed::materials(),
            seed::tech_posts(),
        )
    }

    pub fn open_with_seeds(
        storage: &'s dyn KvStorage,
        profile: LocalProfile,
        courses: Vec<Course>,
        materials: Vec<Material>,
        tech_posts: Vec<TechPost>,
    ) -> Self {
        Self {
            courses: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("academic", "courses"),
                courses,
            ),
            materials: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("academic", "materials"),
                materials,
            ),
            tech_posts: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("academic", "tech_posts"),
                tech_posts,
            ),
            comments: DocumentCell::load_or_default(
                storage,
                StorageKey::new("academic", "comments"),
            ),
            liked_tech: IdSet::load(storage, StorageKey::new("academic", "liked_tech_posts")),
            prefs: DocumentCell::load_or_default(
                storage,
                StorageKey::new("academic", "sort_prefs"),
            ),
            profile,
            pending_delete: PendingDelete::default(),
            rank_table: RecencyRankTable::from_labels(ACADEMIC_TIME_LABELS),
        }
    }

    // ── courses ─────────────────────────────────────────────────────────

    pub fn list_courses(&self, major: Option<&str>, search: &str) -> Vec<Course> {
        let query = ListQuery::new()
            .filter(move |course: &Course| major.map_or(true, |wanted| course.major == wanted))
            .search(search, |course: &Course| vec![course.title.clone()])
            .sort_by(|a: &Course, b: &Course| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            });
        query.apply(self.courses.all())
    }

    // ── materials ───────────────────────────────────────────────────────

    pub fn list_materials(
        &self,
        category: Option<MaterialCategory>,
        search: &str,
        sort: MaterialSort,
        order: SortOrder,
    ) -> Vec<Material> {
        let query = ListQuery::new()
            .filter(move |material: &Material| {
                category.map_or(true, |wanted| material.category == wanted)
            })
            .search(search, |material: &Material| vec![material.title.clone()])
            .sort_by(move |a: &Material, b: &Material| match sort {
                MaterialSort::Downloads => b.downloads.cmp(&a.downloads),
                MaterialSort::Latest => self.rank_table.compare_desc(&a.time_label, &b.time_label),
            })
            .order(order);
        query.apply(self.materials.all())
    }

    pub fn get_material(&self, id: EntityId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn create_material(&mut self, form: NewMaterial) -> ServiceResult<Material> {
        validate_required(&[("title", &form.title), ("size", &form.size_label)])?;

        let material = Material {
            id: self.materials.next_id(),
            title: form.title,
            category: form.category,
            uploader: self.profile.display_name.clone(),
            downloads: 0,
            size_label: form.size_label,
            time_label: "刚刚".to_string(),
        };
        self.materials.insert(material.clone());
        Ok(material)
    }

    /// Registers one download; returns the new counter.
    pub fn download_material(&mut self, id: EntityId) -> ServiceResult<u32> {
        self.materials.update(id, |material| material.downloads += 1)?;
        Ok(self
            .materials
            .get(id)
            .map(|material| material.downloads)
            .unwrap_or(0))
    }

    pub fn request_delete_material(&mut self, id: EntityId) -> ServiceResult<()> {
        let material = self.materials.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(material.uploader.as_str()), &self.profile, id)?;
        self.pending_delete.request(id);
        Ok(())
    }

    pub fn confirm_delete_material(&mut self) -> ServiceResult<Material> {
        let id = self.pending_delete.confirm()?;
        Ok(self.materials.remove(id)?)
    }

    pub fn cancel_delete_material(&mut self) {
        self.pending_delete.cancel();
    }

    pub fn sort_preference(&self) -> &SortPreference {
        self.prefs.get()
    }

    pub fn remember_sort(&mut self, key: impl Into<String>, order: SortOrder) {
        let key = key.into();
        self.prefs.mutate(|prefs| {
            prefs.key = key;
            prefs.order = order;
        });
    }

    // ── tech posts ──────────────────────────────────────────────────────

    pub fn list_tech_posts(&self, search: &str, order: SortOrder) -> Vec<TechPost> {
        let query = ListQuery::new()
            .search(search, |post: &TechPost| vec![post.title.clone()])
            .sort_by(|a: &TechPost, b: &TechPost| {
                self.rank_table.compare_desc(&a.time_label, &b.time_label)
            })
            .order(order);
        query.apply(self.tech_posts.all())
    }

    pub fn get_tech_post(&self, id: EntityId) -> Option<&TechPost> {
        self.tech_posts.get(id)
    }

    pub fn is_tech_post_liked(&self, id: EntityId) -> bool {
        self.liked_tech.contains(id)
    }

    pub fn toggle_tech_like(&mut self, id: EntityId) -> ServiceResult<LikeState> {
        if self.tech_posts.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }

        let liked = self.liked_tech.toggle(id);
        self.tech_posts.update(id, |post| {
            if liked {
                post.likes += 1;
            } else {
                post.likes = post.likes.saturating_sub(1);
            }
        })?;

        let likes = self.tech_posts.get(id).map(|post| post.likes).unwrap_or(0);
        Ok(LikeState { liked, likes })
    }

    /// Appends one comment to a tech post's thread and bumps the reply
    /// counter in the same operation.
    pub fn add_comment(
        &mut self,
        post_id: EntityId,
        content: impl Into<String>,
        now_ms: i64,
    ) -> ServiceResult<Comment> {
        let content = content.into();
        validate_required(&[("content", &content)])?;
        if self.tech_posts.get(post_id).is_none() {
            return Err(ServiceError::NotFound(post_id));
        }

        let comment = Comment {
            id: now_ms,
            author: self.profile.display_name.clone(),
            content,
            time_label: "刚刚".to_string(),
        };
        self.comments.mutate(|threads| {
            threads.entry(post_id).or_default().push(comment.clone());
        });
        self.tech_posts.update(post_id, |post| post.replies += 1)?;
        Ok(comment)
    }

    pub fn comments_for(&self, post_id: EntityId) -> &[Comment] {
        self.comments
            .get()
            .get(&post_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
