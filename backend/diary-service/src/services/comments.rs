/// Comment service - handles comment creation, listing, and management
use crate::db::DiaryRepository;
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_comment_modification;
use crate::models::{Comment, CommentChanges, NewComment, User};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CommentService {
    repo: Arc<dyn DiaryRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self { repo }
    }

    /// Attach a comment by `actor` to an existing post
    pub async fn create_comment(&self, actor: &User, comment: NewComment) -> Result<Comment> {
        comment.validate()?;
        let post_id = comment.post_id;

        let comment = self
            .repo
            .create_comment(actor.id, comment)
            .await?
            .ok_or_else(|| AppError::field("post_id", format!("Post {post_id} does not exist")))?;

        tracing::info!(
            user_id = %actor.id,
            post_id = %post_id,
            comment_id = %comment.id,
            "comment created"
        );
        Ok(comment)
    }

    /// Every comment across all posts
    pub async fn list_comments(&self) -> Result<Vec<Comment>> {
        self.repo.list_comments().await
    }

    pub async fn update_comment(
        &self,
        actor: &User,
        comment_id: Uuid,
        changes: CommentChanges,
    ) -> Result<Comment> {
        let comment = self.find_comment(comment_id).await?;
        check_comment_modification(actor, &comment)?;
        changes.validate()?;

        let comment = self
            .repo
            .update_comment(comment_id, changes)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        tracing::info!(user_id = %actor.id, comment_id = %comment_id, "comment updated");
        Ok(comment)
    }

    pub async fn delete_comment(&self, actor: &User, comment_id: Uuid) -> Result<()> {
        let comment = self.find_comment(comment_id).await?;
        check_comment_modification(actor, &comment)?;

        if !self.repo.delete_comment(comment_id).await? {
            return Err(comment_not_found(comment_id));
        }
        tracing::info!(user_id = %actor.id, comment_id = %comment_id, "comment deleted");
        Ok(())
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Comment> {
        self.repo
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))
    }
}

fn comment_not_found(comment_id: Uuid) -> AppError {
    AppError::NotFound(format!("Comment {comment_id} not found"))
}
