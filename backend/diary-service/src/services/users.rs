/// User service - resolves the acting user and manages diary profiles
use crate::db::DiaryRepository;
use crate::error::{AppError, Result};
use crate::models::{Role, User};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// User ids granted the admin role the first time they are seen
#[derive(Debug, Clone, Default)]
pub struct BootstrapAdmins(Arc<HashSet<Uuid>>);

impl BootstrapAdmins {
    pub fn new(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self(Arc::new(ids.into_iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.0.contains(user_id)
    }
}

pub struct UserService {
    repo: Arc<dyn DiaryRepository>,
    bootstrap_admins: BootstrapAdmins,
}

impl UserService {
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self {
            repo,
            bootstrap_admins: BootstrapAdmins::default(),
        }
    }

    pub fn with_bootstrap_admins(repo: Arc<dyn DiaryRepository>, admins: BootstrapAdmins) -> Self {
        Self {
            repo,
            bootstrap_admins: admins,
        }
    }

    /// Load the user behind an authenticated request, provisioning a member
    /// row for subjects seen for the first time.
    pub async fn resolve_actor(&self, user_id: Uuid, username: &str) -> Result<User> {
        let user = self.repo.ensure_user(user_id, username).await?;

        if user.role != Role::Admin && self.bootstrap_admins.contains(&user_id) {
            tracing::info!(user_id = %user_id, "granting bootstrap admin role");
            return self
                .repo
                .set_user_role(user_id, Role::Admin)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")));
        }

        Ok(user)
    }

    /// Remove a user together with everything they own
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        if !self.repo.delete_user(user_id).await? {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryDiaryRepository;

    fn repo() -> Arc<dyn DiaryRepository> {
        Arc::new(InMemoryDiaryRepository::new())
    }

    #[tokio::test]
    async fn first_sight_provisions_member() {
        let repo = repo();
        let service = UserService::new(repo.clone());
        let id = Uuid::new_v4();

        let user = service.resolve_actor(id, "fresh").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Member);
        assert_eq!(user.subscribers, 0);
        assert_eq!(repo.find_user(id).await.unwrap().unwrap().username, "fresh");
    }

    #[tokio::test]
    async fn bootstrap_admin_is_promoted_once() {
        let admin = Uuid::new_v4();
        let service = UserService::with_bootstrap_admins(repo(), BootstrapAdmins::new([admin]));

        let user = service.resolve_actor(admin, "root").await.unwrap();
        assert_eq!(user.role, Role::Admin);

        let again = service.resolve_actor(admin, "root").await.unwrap();
        assert_eq!(again.role, Role::Admin);

        let member = service.resolve_actor(Uuid::new_v4(), "plain").await.unwrap();
        assert_eq!(member.role, Role::Member);
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let repo = repo();
        let service = UserService::new(repo.clone());
        let id = Uuid::new_v4();

        assert!(matches!(service.delete_user(id).await, Err(AppError::NotFound(_))));

        service.resolve_actor(id, "gone").await.unwrap();
        service.delete_user(id).await.unwrap();
        assert!(repo.find_user(id).await.unwrap().is_none());
    }
}
