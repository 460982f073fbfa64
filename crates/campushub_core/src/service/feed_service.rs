//! Home feed use-case service.
//!
//! # Responsibility
//! - Project the feed through category/search filters and hot/latest sorts.
//! - Keep the liked-post side set and the like counter in lockstep.
//! - Hand post clicks to the navigation bridge.
//!
//! # Invariants
//! - `toggle_like` is self-inverse on both the side set and the counter.
//! - Like decrements clamp at zero.

use crate::model::entity::LocalProfile;
use crate::model::feed::{FeedCategory, FeedPost, PostPreview};
use crate::nav::{NavigationBridge, NavigationIntent};
use crate::repo::{CollectionRepository, DocumentCell, EntityId, IdSet};
use crate::seed;
use crate::service::{ensure_owner, validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{heat_score, ListQuery, RecencyRankTable, SortOrder, SortPreference};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\[\]\(\)!]+"#).expect("valid symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PREVIEW_MAX_CHARS: usize = 100;

/// Relative-time labels used by feed seed data, newest first.
const FEED_TIME_LABELS: &[&str] = &[
    "刚刚",
    "5分钟前",
    "30分钟前",
    "1小时前",
    "3小时前",
    "昨天",
    "2天前",
];

/// Named feed sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    /// Heat score: `views*1 + likes*3 + replies*5`.
    Hot,
    /// Recency-label rank.
    Latest,
}

/// Form input for a new feed post.
#[derive(Debug, Clone)]
pub struct NewFeedPost {
    pub title: String,
    pub content: String,
    pub category: FeedCategory,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u32,
}

/// Feed facade over the posts collection and its side documents.
pub struct FeedService<'s> {
    posts: CollectionRepository<'s, FeedPost>,
    liked: IdSet<'s>,
    prefs: DocumentCell<'s, SortPreference>,
    profile: LocalProfile,
    pending_delete: PendingDelete,
    rank_table: RecencyRankTable,
}

impl<'s> FeedService<'s> {
    pub fn open(storage: &'s dyn KvStorage, profile: LocalProfile) -> Self {
        Self::open_with_seed(storage, profile, seed::feed_posts())
    }

    pub fn open_with_seed(
        storage: &'s dyn KvStorage,
        profile: LocalProfile,
        seed: Vec<FeedPost>,
    ) -> Self {
        Self {
            posts: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("feed", "posts"),
                seed,
            ),
            liked: IdSet::load(storage, StorageKey::new("feed", "liked_posts")),
            prefs: DocumentCell::load_or_default(storage, StorageKey::new("feed", "sort_prefs")),
            profile,
            pending_delete: PendingDelete::default(),
            rank_table: RecencyRankTable::from_labels(FEED_TIME_LABELS),
        }
    }

    pub fn posts(&self) -> &[FeedPost] {
        self.posts.all()
    }

    pub fn get(&self, id: EntityId) -> Option<&FeedPost> {
        self.posts.get(id)
    }

    /// Displayed ordered subset for the current filter/search/sort state.
    pub fn list(
        &self,
        category: Option<FeedCategory>,
        search: &str,
        sort: FeedSort,
        order: SortOrder,
    ) -> Vec<FeedPost> {
        let query = ListQuery::new()
            .filter(move |post: &FeedPost| category.map_or(true, |wanted| post.category == wanted))
            .search(search, |post: &FeedPost| vec![post.title.clone()])
            .sort_by(move |a: &FeedPost, b: &FeedPost| match sort {
                FeedSort::Hot => heat_score(b.views, b.likes, b.replies)
                    .cmp(&heat_score(a.views, a.likes, a.replies)),
                FeedSort::Latest => self.rank_table.compare_desc(&a.time_label, &b.time_label),
            })
            .order(order);
        query.apply(self.posts.all())
    }

    pub fn create_post(&mut self, form: NewFeedPost) -> ServiceResult<FeedPost> {
        validate_required(&[("title", &form.title), ("content", &form.content)])?;

        let post = FeedPost {
            id: self.posts.next_id(),
            title: form.title,
            content: form.content,
            author: self.profile.display_name.clone(),
            category: form.category,
            views: 0,
            likes: 0,
            replies: 0,
            time_label: "刚刚".to_string(),
            origin_element: None,
        };
        self.posts.insert(post.clone());
        Ok(post)
    }

    pub fn is_liked(&self, id: EntityId) -> bool {
        self.liked.contains(id)
    }

    /// Flips the like relation and the counter in one operation.
    pub fn toggle_like(&mut self, id: EntityId) -> ServiceResult<LikeState> {
        if self.posts.get(id).is_none() {
            return Err(ServiceError::NotFound(id));
        }

        let liked = self.liked.toggle(id);
        self.posts.update(id, |post| {
            if liked {
                post.likes += 1;
            } else {
                post.likes = post.likes.saturating_sub(1);
            }
        })?;

        let likes = self.posts.get(id).map(|post| post.likes).unwrap_or(0);
        Ok(LikeState { liked, likes })
    }

    pub fn record_view(&mut self, id: EntityId) -> ServiceResult<()> {
        self.posts.update(id, |post| post.views += 1)?;
        Ok(())
    }

    pub fn update_post(
        &mut self,
        id: EntityId,
        title: Option<String>,
        content: Option<String>,
    ) -> ServiceResult<()> {
        let owner = self.posts.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(owner.author.as_str()), &self.profile, id)?;

        self.posts.update(id, |post| {
            if let Some(title) = title {
                post.title = title;
            }
            if let Some(content) = content {
                post.content = content;
            }
        })?;
        Ok(())
    }

    pub fn request_delete(&mut self, id: EntityId) -> ServiceResult<()> {
        let post = self.posts.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(post.author.as_str()), &self.profile, id)?;
        self.pending_delete.request(id);
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.pending_delete.pending()
    }

    pub fn confirm_delete(&mut self) -> ServiceResult<FeedPost> {
        let id = self.pending_delete.confirm()?;
        Ok(self.posts.remove(id)?)
    }

    pub fn cancel_delete(&mut self) {
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

    /// Routes a click on a card that deep-links into another module.
    ///
    /// Returns `None` for posts native to the feed (no origin element).
    pub fn click_post(
        &self,
        bridge: &mut NavigationBridge<'_>,
        id: EntityId,
    ) -> ServiceResult<Option<NavigationIntent>> {
        let post = self.posts.get(id).ok_or(ServiceError::NotFound(id))?;
        let Some(element_id) = post.origin_element.as_deref() else {
            return Ok(None);
        };
        let snapshot = serde_json::to_string(post)
            .map_err(|err| ServiceError::Validation(format!("snapshot serialization: {err}")))?;
        let intent = bridge.dispatch_post_click(element_id, snapshot)?;
        Ok(Some(intent))
    }
}

/// Derives the card preview for post content.
///
/// Rules follow the feed renderer: first embedded image wins, markdown-ish
/// syntax is stripped from the text, whitespace collapses, and the summary
/// keeps at most 100 chars.
pub fn derive_post_preview(content: &str) -> PostPreview {
    let image = IMAGE_RE
        .captures(content)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|value| !value.is_empty());

    let without_images = IMAGE_RE.replace_all(content, " ");
    let without_links = LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = SYMBOL_RE.replace_all(&without_links, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = collapsed.trim();
    let text = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    };

    PostPreview { text, image }
}
