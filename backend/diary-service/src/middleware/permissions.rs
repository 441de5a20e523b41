/// Authorization checks for diary content
///
/// Posts and comments may be modified by their author or by a user whose role
/// carries elevated privileges. Creating, listing, reacting and subscribing
/// are open to any authenticated user and are not checked here.
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Comment, Post, User};

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Permit iff `actor` authored the resource or is an admin
pub fn check_author_or_admin(actor: &User, author_id: Uuid, resource: &str) -> PermissionResult {
    if actor.id == author_id || actor.role.has_elevated_privileges() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You don't have permission to modify this {resource}"
        )))
    }
}

/// Verify `actor` may update or delete `post`
pub fn check_post_modification(actor: &User, post: &Post) -> PermissionResult {
    check_author_or_admin(actor, post.author_id, "post")
}

/// Verify `actor` may update or delete `comment`
pub fn check_comment_modification(actor: &User, comment: &Comment) -> PermissionResult {
    check_author_or_admin(actor, comment.author_id, "comment")
}
