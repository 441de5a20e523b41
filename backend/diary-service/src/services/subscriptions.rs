/// Subscription service - directed user -> user edges with a subscriber counter
use crate::db::{DiaryRepository, EdgeInsert};
use crate::error::{AppError, Result};
use crate::metrics::record_edge_event;
use crate::models::{Subscription, User};
use std::sync::Arc;
use uuid::Uuid;

pub struct SubscriptionService {
    repo: Arc<dyn DiaryRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self { repo }
    }

    pub async fn subscribe(&self, actor: &User, target_id: Uuid) -> Result<Subscription> {
        if actor.id == target_id {
            record_edge_event("subscribe", "self");
            return Err(AppError::InvalidOperation(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let outcome = self.repo.subscribe(actor.id, target_id).await?;
        record_edge_event("subscribe", outcome.outcome());

        match outcome {
            EdgeInsert::Created(subscription) => {
                tracing::info!(
                    subscriber_id = %actor.id,
                    target_id = %target_id,
                    "subscription created"
                );
                Ok(subscription)
            }
            EdgeInsert::Duplicate => Err(AppError::InvalidOperation(
                "You are already subscribed to this user".to_string(),
            )),
            EdgeInsert::TargetMissing => {
                Err(AppError::NotFound(format!("User {target_id} not found")))
            }
        }
    }

    pub async fn unsubscribe(&self, actor: &User, target_id: Uuid) -> Result<()> {
        if actor.id == target_id {
            record_edge_event("unsubscribe", "self");
            return Err(AppError::InvalidOperation(
                "You cannot unsubscribe from yourself".to_string(),
            ));
        }

        if !self.repo.unsubscribe(actor.id, target_id).await? {
            record_edge_event("unsubscribe", "missing");
            return Err(AppError::NotFound(
                "You are not subscribed to this user".to_string(),
            ));
        }

        record_edge_event("unsubscribe", "removed");
        tracing::info!(
            subscriber_id = %actor.id,
            target_id = %target_id,
            "subscription removed"
        );
        Ok(())
    }
}
