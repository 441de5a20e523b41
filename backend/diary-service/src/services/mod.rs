/// Business logic layer for diary-service
///
/// Each service wraps the shared repository, enforces authorization and
/// turns storage outcomes into `AppError`s.
pub mod comments;
pub mod posts;
pub mod reactions;
pub mod subscriptions;
pub mod users;

pub use comments::CommentService;
pub use posts::PostService;
pub use reactions::ReactionService;
pub use subscriptions::SubscriptionService;
pub use users::{BootstrapAdmins, UserService};
