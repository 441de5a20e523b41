/// Post service - creation, listing, update and deletion of diary posts
use crate::db::DiaryRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_post_modification;
use crate::models::{Category, NewPost, Post, PostChanges, User};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct PostService {
    repo: Arc<dyn DiaryRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self { repo }
    }

    /// Create a post owned by `actor`
    pub async fn create_post(&self, actor: &User, post: NewPost) -> Result<Post> {
        post.validate()?;

        let post = self.repo.create_post(actor.id, post).await?;
        tracing::info!(
            user_id = %actor.id,
            post_id = %post.id,
            category = %post.category,
            is_public = post.is_public,
            "post created"
        );
        Ok(post)
    }

    pub async fn list_public_posts(&self) -> Result<Vec<Post>> {
        self.repo.list_public_posts(None).await
    }

    pub async fn list_own_posts(&self, actor: &User) -> Result<Vec<Post>> {
        self.repo.list_posts_by_author(actor.id).await
    }

    /// Public posts in `category`. Unknown categories yield an empty list.
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Post>> {
        match Category::parse(category) {
            Some(category) => self.repo.list_public_posts(Some(category)).await,
            None => {
                tracing::debug!(%category, "filter on unknown category");
                Ok(Vec::new())
            }
        }
    }

    pub async fn update_post(
        &self,
        actor: &User,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post> {
        let post = self.find_post(post_id).await?;
        check_post_modification(actor, &post)?;
        changes.validate()?;

        if changes.is_empty() {
            return Ok(post);
        }

        let post = self
            .repo
            .update_post(post_id, changes)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        tracing::info!(user_id = %actor.id, post_id = %post_id, "post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &User, post_id: Uuid) -> Result<()> {
        let post = self.find_post(post_id).await?;
        check_post_modification(actor, &post)?;

        if !self.repo.delete_post(post_id).await? {
            return Err(post_not_found(post_id));
        }
        tracing::info!(user_id = %actor.id, post_id = %post_id, "post deleted");
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }
}

fn post_not_found(post_id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {post_id} not found"))
}
