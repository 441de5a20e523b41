//! Data models for diary-service
//!
//! Rows persisted by the repositories plus the input records accepted by the
//! HTTP layer. Every identifier is a random v4 UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Role attached to a diary user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    /// Admins may modify posts and comments they do not own.
    pub fn has_elevated_privileges(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

/// Fixed set of post categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Art,
    Books,
    Business,
    Education,
    Fashion,
    Food,
    Games,
    Health,
    Movies,
    Music,
    Nature,
    Personal,
    Photography,
    Politics,
    Science,
    Sport,
    Technology,
    Travel,
    Other,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Art,
        Category::Books,
        Category::Business,
        Category::Education,
        Category::Fashion,
        Category::Food,
        Category::Games,
        Category::Health,
        Category::Movies,
        Category::Music,
        Category::Nature,
        Category::Personal,
        Category::Photography,
        Category::Politics,
        Category::Science,
        Category::Sport,
        Category::Technology,
        Category::Travel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Art => "art",
            Category::Books => "books",
            Category::Business => "business",
            Category::Education => "education",
            Category::Fashion => "fashion",
            Category::Food => "food",
            Category::Games => "games",
            Category::Health => "health",
            Category::Movies => "movies",
            Category::Music => "music",
            Category::Nature => "nature",
            Category::Personal => "personal",
            Category::Photography => "photography",
            Category::Politics => "politics",
            Category::Science => "science",
            Category::Sport => "sport",
            Category::Technology => "technology",
            Category::Travel => "travel",
            Category::Other => "other",
        }
    }

    /// Exact, case-sensitive match. `None` for anything outside the fixed set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub subscribers: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub category: Category,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Directed edge `subscriber -> subscribed_to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub subscribed_to_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A like or dislike cast by `author_id` on `post_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reaction {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Edge table holding this kind of reaction
    pub fn table(&self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }

    /// Counter column on `posts` mirroring the edge table
    pub fn counter_column(&self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

// =====================================================================
// Input records
// =====================================================================

/// Body of a post creation request.
///
/// Author and timestamps are assigned by the server; unknown fields such as
/// `author` or `created_at` are ignored during deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    pub category: Category,
}

fn default_is_public() -> bool {
    true
}

/// Partial post update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostChanges {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    pub is_public: Option<bool>,
    pub category: Option<Category>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_public.is_none()
            && self.category.is_none()
    }

    /// Apply the provided fields onto `post`, leaving ownership and timestamps alone.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(is_public) = self.is_public {
            post.is_public = is_public;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    pub post_id: Uuid,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentChanges {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}
