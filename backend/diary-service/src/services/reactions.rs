/// Reaction service - likes and dislikes on posts
use crate::db::{DiaryRepository, EdgeInsert};
use crate::error::{AppError, Result};
use crate::metrics::record_edge_event;
use crate::models::{Reaction, ReactionKind, User};
use std::sync::Arc;
use uuid::Uuid;

pub struct ReactionService {
    repo: Arc<dyn DiaryRepository>,
}

impl ReactionService {
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self { repo }
    }

    /// Cast a like or dislike. Reactions are permanent; a repeat is rejected.
    pub async fn react(&self, actor: &User, kind: ReactionKind, post_id: Uuid) -> Result<Reaction> {
        let outcome = self.repo.add_reaction(kind, actor.id, post_id).await?;
        record_edge_event(kind.as_str(), outcome.outcome());

        match outcome {
            EdgeInsert::Created(reaction) => {
                tracing::info!(
                    user_id = %actor.id,
                    post_id = %post_id,
                    kind = kind.as_str(),
                    "reaction recorded"
                );
                Ok(reaction)
            }
            EdgeInsert::Duplicate => Err(AppError::InvalidOperation(format!(
                "You have already given a {} to this post",
                kind.as_str()
            ))),
            EdgeInsert::TargetMissing => {
                Err(AppError::NotFound(format!("Post {post_id} not found")))
            }
        }
    }
}
