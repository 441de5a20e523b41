use super::{DiaryRepository, EdgeInsert};
use crate::error::Result;
use crate::models::{
    Category, Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, Reaction,
    ReactionKind, Role, Subscription, User,
};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    // Vecs keep insertion order for listings
    posts: Vec<Post>,
    comments: Vec<Comment>,
    subscriptions: Vec<Subscription>,
    likes: Vec<Reaction>,
    dislikes: Vec<Reaction>,
}

impl Store {
    fn reactions(&self, kind: ReactionKind) -> &Vec<Reaction> {
        match kind {
            ReactionKind::Like => &self.likes,
            ReactionKind::Dislike => &self.dislikes,
        }
    }

    fn reactions_mut(&mut self, kind: ReactionKind) -> &mut Vec<Reaction> {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
        }
    }

    fn post_mut(&mut self, post_id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }

    fn remove_posts_where(&mut self, pred: impl Fn(&Post) -> bool) -> usize {
        let doomed: Vec<Uuid> = self.posts.iter().filter(|&p| pred(p)).map(|p| p.id).collect();
        self.posts.retain(|p| !doomed.contains(&p.id));
        self.comments.retain(|c| !doomed.contains(&c.post_id));
        self.likes.retain(|r| !doomed.contains(&r.post_id));
        self.dislikes.retain(|r| !doomed.contains(&r.post_id));
        doomed.len()
    }
}

/// Process-local repository with the same semantics as the PostgreSQL adapter.
///
/// A single write lock covers each edge insert and its counter update.
#[derive(Default)]
pub struct InMemoryDiaryRepository {
    store: RwLock<Store>,
}

impl InMemoryDiaryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DiaryRepository for InMemoryDiaryRepository {
    async fn ensure_user(&self, user_id: Uuid, username: &str) -> Result<User> {
        let mut store = self.store.write().await;
        let user = store.users.entry(user_id).or_insert_with(|| User {
            id: user_id,
            username: username.to_string(),
            role: Role::Member,
            subscribers: 0,
            created_at: Utc::now(),
        });
        user.username = username.to_string();
        Ok(user.clone())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.store.read().await.users.get(&user_id).cloned())
    }

    async fn set_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>> {
        let mut store = self.store.write().await;
        Ok(store.users.get_mut(&user_id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let mut store = self.store.write().await;
        if store.users.remove(&user_id).is_none() {
            return Ok(false);
        }

        store.remove_posts_where(|p| p.author_id == user_id);
        store.comments.retain(|c| c.author_id != user_id);

        let followed: Vec<Uuid> = store
            .subscriptions
            .iter()
            .filter(|s| s.subscriber_id == user_id)
            .map(|s| s.subscribed_to_id)
            .collect();
        for target in followed {
            if let Some(user) = store.users.get_mut(&target) {
                user.subscribers = (user.subscribers - 1).max(0);
            }
        }
        store
            .subscriptions
            .retain(|s| s.subscriber_id != user_id && s.subscribed_to_id != user_id);

        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            let reacted: Vec<Uuid> = store
                .reactions(kind)
                .iter()
                .filter(|r| r.author_id == user_id)
                .map(|r| r.post_id)
                .collect();
            for post_id in reacted {
                if let Some(post) = store.post_mut(post_id) {
                    match kind {
                        ReactionKind::Like => post.likes = (post.likes - 1).max(0),
                        ReactionKind::Dislike => post.dislikes = (post.dislikes - 1).max(0),
                    }
                }
            }
            store.reactions_mut(kind).retain(|r| r.author_id != user_id);
        }

        Ok(true)
    }

    async fn create_post(&self, author_id: Uuid, post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            title: post.title,
            content: post.content,
            is_public: post.is_public,
            category: post.category,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn list_public_posts(&self, category: Option<Category>) -> Result<Vec<Post>> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .filter(|p| p.is_public && category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    async fn list_posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut store = self.store.write().await;
        Ok(store.post_mut(post_id).map(|post| {
            changes.apply_to(post);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut store = self.store.write().await;
        Ok(store.remove_posts_where(|p| p.id == post_id) > 0)
    }

    async fn create_comment(
        &self,
        author_id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Comment>> {
        let mut store = self.store.write().await;
        if !store.posts.iter().any(|p| p.id == comment.post_id) {
            return Ok(None);
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            author_id,
            content: comment.content,
            created_at: now,
            updated_at: now,
        };
        store.comments.push(comment.clone());
        Ok(Some(comment))
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let store = self.store.read().await;
        Ok(store.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        Ok(self.store.read().await.comments.clone())
    }

    async fn update_comment(
        &self,
        comment_id: Uuid,
        changes: CommentChanges,
    ) -> Result<Option<Comment>> {
        let mut store = self.store.write().await;
        Ok(store
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .map(|comment| {
                comment.content = changes.content;
                comment.updated_at = Utc::now();
                comment.clone()
            }))
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        let mut store = self.store.write().await;
        let before = store.comments.len();
        store.comments.retain(|c| c.id != comment_id);
        Ok(store.comments.len() < before)
    }

    async fn subscribe(
        &self,
        subscriber_id: Uuid,
        target_id: Uuid,
    ) -> Result<EdgeInsert<Subscription>> {
        let mut store = self.store.write().await;
        if !store.users.contains_key(&target_id) {
            return Ok(EdgeInsert::TargetMissing);
        }
        if store
            .subscriptions
            .iter()
            .any(|s| s.subscriber_id == subscriber_id && s.subscribed_to_id == target_id)
        {
            return Ok(EdgeInsert::Duplicate);
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            subscriber_id,
            subscribed_to_id: target_id,
            created_at: Utc::now(),
        };
        store.subscriptions.push(subscription.clone());
        if let Some(target) = store.users.get_mut(&target_id) {
            target.subscribers += 1;
        }

        Ok(EdgeInsert::Created(subscription))
    }

    async fn unsubscribe(&self, subscriber_id: Uuid, target_id: Uuid) -> Result<bool> {
        let mut store = self.store.write().await;
        let before = store.subscriptions.len();
        store
            .subscriptions
            .retain(|s| !(s.subscriber_id == subscriber_id && s.subscribed_to_id == target_id));
        if store.subscriptions.len() == before {
            return Ok(false);
        }

        if let Some(target) = store.users.get_mut(&target_id) {
            target.subscribers = (target.subscribers - 1).max(0);
        }
        Ok(true)
    }

    async fn add_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        post_id: Uuid,
    ) -> Result<EdgeInsert<Reaction>> {
        let mut store = self.store.write().await;
        if !store.posts.iter().any(|p| p.id == post_id) {
            return Ok(EdgeInsert::TargetMissing);
        }
        if store
            .reactions(kind)
            .iter()
            .any(|r| r.author_id == author_id && r.post_id == post_id)
        {
            return Ok(EdgeInsert::Duplicate);
        }

        let reaction = Reaction {
            id: Uuid::new_v4(),
            author_id,
            post_id,
            created_at: Utc::now(),
        };
        store.reactions_mut(kind).push(reaction.clone());
        if let Some(post) = store.post_mut(post_id) {
            match kind {
                ReactionKind::Like => post.likes += 1,
                ReactionKind::Dislike => post.dislikes += 1,
            }
        }

        Ok(EdgeInsert::Created(reaction))
    }
}
