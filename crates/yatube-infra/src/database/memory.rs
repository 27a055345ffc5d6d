//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{
    Group, GroupId, NewGroup, NewPost, NewUser, Post, PostId, User, UserId,
};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

/// Rows keyed by id plus the next id to hand out.
struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn get(&self, id: i64) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn replace(&self, id: i64, row: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(existing) => {
                *existing = row.clone();
                Ok(row)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().await.values().find(|row| pred(row)).cloned()
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, NewUser, UserId> for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut rows = self.table.rows.write().await;
        if rows.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let user = User {
            id: self.table.allocate_id(),
            username: new.username,
            password_hash: new.password_hash,
            created_at: new.created_at,
        };
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        self.table.replace(entity.id, entity).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.table.find(|u| u.username == username).await)
    }
}

/// In-memory group repository.
pub struct InMemoryGroupRepository {
    table: Table<Group>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Group, NewGroup, GroupId> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn insert(&self, new: NewGroup) -> Result<Group, RepoError> {
        let mut rows = self.table.rows.write().await;
        if rows.values().any(|g| g.slug == new.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let group = Group {
            id: self.table.allocate_id(),
            title: new.title,
            slug: new.slug,
            description: new.description,
        };
        rows.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, entity: Group) -> Result<Group, RepoError> {
        self.table.replace(entity.id, entity).await
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        Ok(self.table.find(|g| g.slug == slug).await)
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.table.rows.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    table: Table<Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    /// Matching posts, newest first.
    async fn matching(&self, filter: PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .table
            .rows
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let post = Post {
            id: self.table.allocate_id(),
            text: new.text,
            created_at: new.created_at,
            author_id: new.author_id,
            group_id: new.group_id,
        };
        self.table.rows.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        self.table.replace(entity.id, entity).await
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let rows = self.table.rows.read().await;
        Ok(rows.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_slice(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .matching(filter)
            .await
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}
