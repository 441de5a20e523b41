/// Like / dislike handlers
use crate::db::DiaryRepository;
use crate::error::Result;
use crate::middleware::Actor;
use crate::models::ReactionKind;
use crate::services::ReactionService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

async fn react(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    kind: ReactionKind,
    post_id: Uuid,
) -> Result<HttpResponse> {
    let service = ReactionService::new(repo.into_inner());
    let reaction = service.react(&actor.0, kind, post_id).await?;

    Ok(HttpResponse::Created().json(reaction))
}

pub async fn like_post(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    react(repo, actor, ReactionKind::Like, *post_id).await
}

pub async fn dislike_post(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    react(repo, actor, ReactionKind::Dislike, *post_id).await
}
