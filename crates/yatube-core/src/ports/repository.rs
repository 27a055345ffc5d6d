use async_trait::async_trait;

use crate::domain::{
    Group, GroupId, NewGroup, NewPost, NewUser, Post, PostId, User, UserId,
};
use crate::error::RepoError;
use crate::pagination::{Page, Paginator};

/// Generic repository trait defining the standard persistence operations.
///
/// `T` is the stored entity, `N` the not-yet-stored form of it and `ID` its key.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity and return it with its assigned ID.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, UserId> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, NewGroup, GroupId> {
    /// Find a group by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a feed contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(GroupId),
    Author(UserId),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Group(group_id) => post.group_id == Some(*group_id),
            Self::Author(author_id) => post.author_id == *author_id,
        }
    }
}

/// Post repository.
///
/// Every listing is ordered newest first: `created_at` descending, then `id`
/// descending.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, PostId> {
    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    /// Up to `limit` matching posts starting at `offset`.
    async fn find_slice(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// One page of matching posts.
    ///
    /// `page_number` is clamped into the valid page range first; the returned
    /// page carries the number it was clamped to.
    async fn find_page(
        &self,
        filter: PostFilter,
        page_number: i64,
        page_size: u64,
    ) -> Result<Page<Post>, RepoError> {
        let total = self.count(filter).await?;
        let paginator = Paginator::new(total, page_size);
        let number = paginator.clamp(page_number);
        let items = self
            .find_slice(filter, paginator.offset(number), paginator.page_size())
            .await?;
        Ok(paginator.page(number, items))
    }
}
