/// HTTP handlers for diary endpoints
///
/// - Posts: create, list, filter, update, delete
/// - Comments: create, list, update, delete
/// - Subscriptions: subscribe / unsubscribe to another user
/// - Reactions: like / dislike a post
/// - Health: liveness, readiness and summary probes
pub mod comments;
pub mod health;
pub mod posts;
pub mod reactions;
pub mod subscriptions;

pub use comments::{create_comment, delete_comment, list_comments, update_comment};
pub use health::{health_summary, liveness_check, readiness_summary, HealthState};
pub use posts::{create_post, delete_post, filter_posts, list_my_posts, list_posts, update_post};
pub use reactions::{dislike_post, like_post};
pub use subscriptions::{subscribe, unsubscribe};

use crate::error::AppError;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use actix_web::web;

/// JSON extractor config that reports malformed bodies as validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::from(err).into())
}

/// Path extractor config: an unparsable id names no resource
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, req| AppError::NotFound(format!("{}: {err}", req.path())).into())
}

/// Register the authenticated `/diaries` routes.
///
/// Expects `web::Data<dyn DiaryRepository>` (and optionally
/// `web::Data<BootstrapAdmins>`) to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/diaries")
            .app_data(json_config())
            .app_data(path_config())
            .wrap(JwtAuthMiddleware)
            .wrap(MetricsMiddleware)
            .route("/post/create/", web::post().to(create_post))
            .route("/post/list/", web::get().to(list_posts))
            .route("/my_post/list/", web::get().to(list_my_posts))
            .service(
                web::resource("/post/update/{post_id}/")
                    .route(web::put().to(update_post))
                    .route(web::patch().to(update_post)),
            )
            .route("/post/delete/{post_id}/", web::delete().to(delete_post))
            .route("/post/filter/{category}/", web::get().to(filter_posts))
            .route("/post/like/{post_id}/", web::post().to(like_post))
            .route("/post/dislike/{post_id}/", web::post().to(dislike_post))
            .route("/comment/create/", web::post().to(create_comment))
            .route("/comments/", web::get().to(list_comments))
            .route("/comment/update/{comment_id}/", web::put().to(update_comment))
            .route("/comment/delete/{comment_id}/", web::delete().to(delete_comment))
            .route("/subscribe/{user_id}/", web::post().to(subscribe))
            .route("/unsubscribe/{user_id}/", web::delete().to(unsubscribe)),
    );
}

/// Register unauthenticated operational routes
pub fn configure_operational(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .route("/api/v1/health", web::get().to(health_summary))
        .route("/api/v1/health/ready", web::get().to(readiness_summary))
        .route("/api/v1/health/live", web::get().to(liveness_check));
}
