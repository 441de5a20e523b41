/// Subscription handlers
use crate::db::DiaryRepository;
use crate::error::Result;
use crate::middleware::Actor;
use crate::services::SubscriptionService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn subscribe(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SubscriptionService::new(repo.into_inner());
    let subscription = service.subscribe(&actor.0, *target_id).await?;

    Ok(HttpResponse::Created().json(subscription))
}

pub async fn unsubscribe(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    target_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SubscriptionService::new(repo.into_inner());
    service.unsubscribe(&actor.0, *target_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
