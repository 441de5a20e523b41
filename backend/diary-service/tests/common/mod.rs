//! Shared helpers for diary-service HTTP tests.
#![allow(dead_code)]

use crypto_core::{jwt, test_keys};
use diary_service::db::{DiaryRepository, InMemoryDiaryRepository};
use std::sync::Arc;
use uuid::Uuid;

/// A user with a valid access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn new(username: &str) -> Self {
        test_keys::install_test_keys();
        let id = Uuid::new_v4();
        let token = jwt::generate_access_token(id, username).expect("mint access token");
        Self {
            id,
            username: username.to_string(),
            token,
        }
    }

    pub fn auth(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }

    /// Make the user known to the store without going through HTTP
    pub async fn register(&self, repo: &Arc<dyn DiaryRepository>) {
        repo.ensure_user(self.id, &self.username)
            .await
            .expect("provision user");
    }
}

pub fn memory_repo() -> Arc<dyn DiaryRepository> {
    Arc::new(InMemoryDiaryRepository::new())
}

/// Build an actix test service with the diary routes over `$repo`.
macro_rules! diary_app {
    ($repo:expr) => {
        diary_app!($repo, diary_service::services::BootstrapAdmins::default())
    };
    ($repo:expr, $admins:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::<dyn diary_service::db::DiaryRepository>::from(
                    $repo.clone(),
                ))
                .app_data(actix_web::web::Data::new($admins))
                .configure(diary_service::handlers::configure),
        )
        .await
    };
}
