/// Post handlers - HTTP endpoints for post operations
use crate::db::DiaryRepository;
use crate::error::Result;
use crate::middleware::Actor;
use crate::models::{NewPost, PostChanges};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Create a new post owned by the caller
pub async fn create_post(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    req: web::Json<NewPost>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    let post = service.create_post(&actor.0, req.into_inner()).await?;

    Ok(HttpResponse::Created().json(post))
}

/// List every public post
pub async fn list_posts(repo: web::Data<dyn DiaryRepository>, _actor: Actor) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    let posts = service.list_public_posts().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// List the caller's posts, public and private
pub async fn list_my_posts(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    let posts = service.list_own_posts(&actor.0).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// List public posts in one category
pub async fn filter_posts(
    repo: web::Data<dyn DiaryRepository>,
    _actor: Actor,
    category: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    let posts = service.filter_by_category(&category).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Update a post (PUT or PATCH, both partial)
pub async fn update_post(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    post_id: web::Path<Uuid>,
    req: web::Json<PostChanges>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    let post = service
        .update_post(&actor.0, *post_id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post and everything attached to it
pub async fn delete_post(
    repo: web::Data<dyn DiaryRepository>,
    actor: Actor,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.into_inner());
    service.delete_post(&actor.0, *post_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
