//! Database access layer
//!
//! [`DiaryRepository`] is the storage port the services talk to. Two adapters
//! implement it:
//! - [`PgDiaryRepository`]: PostgreSQL via sqlx, one transaction per edge write
//! - [`InMemoryDiaryRepository`]: process-local store for development and tests

pub mod memory_repo;
pub mod pg_repo;

pub use memory_repo::InMemoryDiaryRepository;
pub use pg_repo::PgDiaryRepository;

use crate::error::Result;
use crate::models::{
    Category, Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, Reaction,
    ReactionKind, Role, Subscription, User,
};
use uuid::Uuid;

/// Outcome of inserting a uniqueness-constrained edge
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeInsert<T> {
    /// The edge was new and the matching counter was incremented
    Created(T),
    /// The edge already existed; nothing changed
    Duplicate,
    /// The user or post the edge points at does not exist
    TargetMissing,
}

impl<T> EdgeInsert<T> {
    pub fn outcome(&self) -> &'static str {
        match self {
            EdgeInsert::Created(_) => "created",
            EdgeInsert::Duplicate => "duplicate",
            EdgeInsert::TargetMissing => "target_missing",
        }
    }
}

/// Storage operations for users, posts, comments and their edges.
///
/// Implementations must keep `users.subscribers`, `posts.likes` and
/// `posts.dislikes` equal to the number of matching edge rows: a counter only
/// moves on the branch that actually inserted or removed an edge.
#[async_trait::async_trait]
pub trait DiaryRepository: Send + Sync {
    /// Fetch the user, creating a `member` row on first sight.
    /// The stored username is refreshed from `username`.
    async fn ensure_user(&self, user_id: Uuid, username: &str) -> Result<User>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Returns `None` if the user does not exist
    async fn set_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>>;

    /// Delete a user and everything they own. Counters of users they were
    /// subscribed to, and of posts they reacted to, are decremented.
    async fn delete_user(&self, user_id: Uuid) -> Result<bool>;

    async fn create_post(&self, author_id: Uuid, post: NewPost) -> Result<Post>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Public posts in insertion order, optionally restricted to one category
    async fn list_public_posts(&self, category: Option<Category>) -> Result<Vec<Post>>;

    /// Every post by `author_id`, public or not
    async fn list_posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>>;

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    /// Removes the post with its comments and reactions
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Returns `None` when `comment.post_id` does not reference a post
    async fn create_comment(&self, author_id: Uuid, comment: NewComment)
        -> Result<Option<Comment>>;

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    async fn list_comments(&self) -> Result<Vec<Comment>>;

    async fn update_comment(
        &self,
        comment_id: Uuid,
        changes: CommentChanges,
    ) -> Result<Option<Comment>>;

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool>;

    /// Insert `subscriber -> target` and bump the target's subscriber count
    async fn subscribe(&self, subscriber_id: Uuid, target_id: Uuid)
        -> Result<EdgeInsert<Subscription>>;

    /// Remove `subscriber -> target`; `false` if there was no edge.
    /// The target's count is decremented, never below zero.
    async fn unsubscribe(&self, subscriber_id: Uuid, target_id: Uuid) -> Result<bool>;

    /// Insert a like or dislike edge and bump the post's matching counter
    async fn add_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<EdgeInsert<Reaction>>;

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
