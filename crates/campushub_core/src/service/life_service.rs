//! Life-sharing use-case service.

use crate::model::academic::Comment;
use crate::model::entity::LocalProfile;
use crate::model::feed::PostPreview;
use crate::model::life::LifePost;
use crate::repo::{CollectionRepository, EntityId, IdSet};
use crate::seed;
use crate::service::feed_service::{derive_post_preview, LikeState};
use crate::service::{ensure_owner, validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{ListQuery, RecencyRankTable, SortOrder};

const LIFE_TIME_LABELS: &[&str] = &["刚刚", "1小时前", "3小时前", "昨天", "2天前"];

/// Form input for a new life post. Image entries are display paths only.
#[derive(Debug, Clone)]
pub struct NewLifePost {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

/// Life-sharing facade over the posts collection and the liked side set.
pub struct LifeService<'s> {
    posts: CollectionRepository<'s, LifePost>,
    liked: IdSet<'s>,
    profile: LocalProfile,
    pending_delete: PendingDelete,
    rank_table: RecencyRankTable,
}

impl<'s> LifeService<'s> {
    pub fn open(storage: &'s dyn KvStorage, profile: LocalProfile) -> Self {
        Self::open_with_seed(storage, profile, seed::life_posts())
    }

    pub fn open_with_seed(
        storage: &'s dyn KvStorage,
        profile: LocalProfile,
        seed: Vec<LifePost>,
    ) -> Self {
        Self {
            posts: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("life", "posts"),
                seed,
            ),
            liked: IdSet::load(storage, StorageKey::new("life", "liked_posts")),
            profile,
            pending_delete: PendingDelete::default(),
            rank_table: RecencyRankTable::from_labels(LIFE_TIME_LABELS),
        }
    }

    pub fn posts(&self) -> &[LifePost] {
        self.posts.all()
    }

    pub fn get(&self, id: EntityId) -> Option<&LifePost> {
        self.posts.get(id)
    }

    pub fn list(&self, search: &str, order: SortOrder) -> Vec<LifePost> {
        let query = ListQuery::new()
            .search(search, |post: &LifePost| vec![post.title.clone()])
            .sort_by(|a: &LifePost, b: &LifePost| {
                self.rank_table.compare_desc(&a.time_label, &b.time_label)
            })
            .order(order);
        query.apply(self.posts.all())
    }

    pub fn create_post(&mut self, form: NewLifePost) -> ServiceResult<LifePost> {
        validate_required(&[("title", &form.title), ("content", &form.content)])?;

        let post = LifePost {
            id: self.posts.next_id(),
            title: form.title,
            content: form.content,
            author: self.profile.display_name.clone(),
            images: form.images,
            likes: 0,
            comments: Vec::new(),
            time_label: "刚刚".to_string(),
        };
        self.posts.insert(post.clone());
        Ok(post)
    }

    pub fn is_liked(&self, id: EntityId) -> bool {
        self.liked.contains(id)
    }

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

    /// Appends one comment inline on the post. Comment ids are epoch ms.
    pub fn add_comment(
        &mut self,
        post_id: EntityId,
        content: impl Into<String>,
        now_ms: i64,
    ) -> ServiceResult<Comment> {
        let content = content.into();
        validate_required(&[("content", &content)])?;

        let comment = Comment {
            id: now_ms,
            author: self.profile.display_name.clone(),
            content,
            time_label: "刚刚".to_string(),
        };
        let appended = comment.clone();
        self.posts
            .update(post_id, |post| post.comments.push(appended))?;
        Ok(comment)
    }

    /// Card preview derived from the post content.
    pub fn preview(&self, id: EntityId) -> ServiceResult<PostPreview> {
        let post = self.posts.get(id).ok_or(ServiceError::NotFound(id))?;
        Ok(derive_post_preview(&post.content))
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

    pub fn confirm_delete(&mut self) -> ServiceResult<LifePost> {
        let id = self.pending_delete.confirm()?;
        Ok(self.posts.remove(id)?)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }
}
