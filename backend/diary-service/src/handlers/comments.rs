/// Comment handlers - HTTP endpoints for comment operations
use crate::db::DiaryRepository;
use crate::error::Result;
use crate::middleware::Actor;
use crate::models::{CommentChanges, NewComment};
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn create_comment(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    req: web::Json<NewComment>,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.into_inner());
    let comment = service.create_comment(&actor.0, req.into_inner()).await?;

    Ok(HttpResponse::Created().json(comment))
}

pub async fn list_comments(
    repo: web::Data<dyn DiaryRepository>,
    _actor: Actor,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.into_inner());
    let comments = service.list_comments().await?;

    Ok(HttpResponse::Ok().json(comments))
}

pub async fn update_comment(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    comment_id: web::Path<Uuid>,
    req: web::Json<CommentChanges>,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.into_inner());
    let comment = service
        .update_comment(&actor.0, *comment_id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

pub async fn delete_comment(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.into_inner());
    service.delete_comment(&actor.0, *comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
