use super::{DiaryRepository, EdgeInsert};
use crate::error::Result;
use crate::models::{
    Category, Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, Reaction,
    ReactionKind, Role, Subscription, User,
};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, role, subscribers, created_at";
const POST_COLUMNS: &str =
    "id, author_id, title, content, is_public, category, likes, dislikes, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, post_id, author_id, content, created_at, updated_at";

/// A referenced user or post vanished before the insert landed
fn is_missing_reference(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgDiaryRepository {
    pool: PgPool,
    service_name: String,
}

impl PgDiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            service_name: "diary-service".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DiaryRepository for PgDiaryRepository {
    async fn ensure_user(&self, user_id: Uuid, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Counters elsewhere would drift once the cascade removes these edges
        sqlx::query(
            r#"
            UPDATE users SET subscribers = GREATEST(subscribers - 1, 0)
            WHERE id IN (SELECT subscribed_to_id FROM subscriptions WHERE subscriber_id = $1)
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            sqlx::query(&format!(
                r#"
                UPDATE posts SET {col} = GREATEST({col} - 1, 0)
                WHERE author_id <> $1
                  AND id IN (SELECT post_id FROM {table} WHERE author_id = $1)
                "#,
                col = kind.counter_column(),
                table = kind.table(),
            ))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_post(&self, author_id: Uuid, post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, author_id, title, content, is_public, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.is_public)
        .bind(post.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_public_posts(&self, category: Option<Category>) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE is_public
              AND ($1::post_category IS NULL OR category = $1)
            ORDER BY created_at, id
            "#
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY created_at, id"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_public = COALESCE($4, is_public),
                category = COALESCE($5, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.is_public)
        .bind(changes.category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(
        &self,
        author_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Comment>> {
        let result = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (id, post_id, author_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(comment.post_id)
        .bind(author_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(comment) => Ok(Some(comment)),
            Err(e) if is_missing_reference(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update_comment(
        &self,
        comment_id: Uuid,
        changes: CommentChanges,
    ) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(comment_id)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn subscribe(
        &self,
        subscriber_id: Uuid,
        target_id: Uuid,
    ) -> Result<EdgeInsert<Subscription>> {
        let mut tx = self.pool.begin().await?;

        // Key-share lock holds off a concurrent delete of the target until commit
        let target: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR KEY SHARE")
                .bind(target_id)
                .fetch_optional(&mut *tx)
                .await?;
        if target.is_none() {
            tx.rollback().await?;
            return Ok(EdgeInsert::TargetMissing);
        }

        let inserted = match sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (id, subscriber_id, subscribed_to_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (subscriber_id, subscribed_to_id) DO NOTHING
            RETURNING id, subscriber_id, subscribed_to_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscriber_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) if is_missing_reference(&e) => {
                tx.rollback().await?;
                return Ok(EdgeInsert::TargetMissing);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(subscription) = inserted else {
            tx.rollback().await?;
            return Ok(EdgeInsert::Duplicate);
        };

        sqlx::query("UPDATE users SET subscribers = subscribers + 1 WHERE id = $1")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(EdgeInsert::Created(subscription))
    }

    async fn unsubscribe(&self, subscriber_id: Uuid, target_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let removed: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND subscribed_to_id = $2
            RETURNING id
            "#,
        )
        .bind(subscriber_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

        if removed.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE users SET subscribers = GREATEST(subscribers - 1, 0) WHERE id = $1")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn add_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<EdgeInsert<Reaction>> {
        let mut tx = self.pool.begin().await?;

        let post: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR KEY SHARE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
        if post.is_none() {
            tx.rollback().await?;
            return Ok(EdgeInsert::TargetMissing);
        }

        let inserted = match sqlx::query_as::<_, Reaction>(&format!(
            r#"
            INSERT INTO {table} (id, author_id, post_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (author_id, post_id) DO NOTHING
            RETURNING id, author_id, post_id, created_at
            "#,
            table = kind.table(),
        ))
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) if is_missing_reference(&e) => {
                tx.rollback().await?;
                return Ok(EdgeInsert::TargetMissing);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(reaction) = inserted else {
            tx.rollback().await?;
            return Ok(EdgeInsert::Duplicate);
        };

        sqlx::query(&format!(
            "UPDATE posts SET {col} = {col} + 1 WHERE id = $1",
            col = kind.counter_column(),
        ))
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(EdgeInsert::Created(reaction))
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = db_pool::acquire_with_metrics(&self.pool, &self.service_name).await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
