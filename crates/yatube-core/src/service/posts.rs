use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    Actor, Author, Group, GroupId, NewPost, Post, PostEntry, PostId, User, UserId,
};
use crate::error::DomainError;
use crate::form::{PostInput, validate_post};
use crate::pagination::{DEFAULT_PAGE_SIZE, Page};
use crate::policy::ensure_can_edit;
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

/// One page of a group's posts.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// One page of an author's posts.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: Author,
    pub post_count: u64,
    pub page: Page<PostEntry>,
}

/// A single post and how many posts its author has written.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub entry: PostEntry,
    pub author_post_count: u64,
}

/// Feeds, post detail and the create/edit flows.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    page_size: u64,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Every post, newest first.
    pub async fn index(&self, page: i64) -> Result<Page<PostEntry>, DomainError> {
        self.feed(PostFilter::All, page).await
    }

    /// Posts of the group with `slug`.
    pub async fn group_posts(&self, slug: &str, page: i64) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        let page = self.feed(PostFilter::Group(group.id), page).await?;
        Ok(GroupFeed { group, page })
    }

    /// Posts written by `username`.
    pub async fn profile(&self, username: &str, page: i64) -> Result<ProfileFeed, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let page = self.feed(PostFilter::Author(user.id), page).await?;
        Ok(ProfileFeed {
            post_count: page.total_items,
            author: author_of(&user),
            page,
        })
    }

    /// A post with its author's total post count.
    pub async fn post_detail(&self, post_id: PostId) -> Result<PostDetail, DomainError> {
        let post = self.find_post(post_id).await?;
        let author_post_count = self.posts.count(PostFilter::Author(post.author_id)).await?;

        let entry = self
            .resolve(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("Post {post_id} vanished")))?;

        Ok(PostDetail {
            entry,
            author_post_count,
        })
    }

    /// Groups a post can be filed under.
    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    /// Publish a new post as `actor`.
    pub async fn create_post(&self, input: PostInput, actor: &Actor) -> Result<Post, DomainError> {
        let author_id = actor.require_user()?;
        let values = validate_post(input, self.groups.as_ref()).await?;

        let post = self.posts.insert(NewPost::new(author_id, values)).await?;
        tracing::info!(post_id = post.id, author_id, "Post created");
        Ok(post)
    }

    /// The post `actor` wants to edit, once they are allowed to.
    pub async fn edit_form(&self, post_id: PostId, actor: &Actor) -> Result<Post, DomainError> {
        actor.require_user()?;
        let post = self.find_post(post_id).await?;
        self.check_author(actor, &post)?;
        Ok(post)
    }

    /// Change the text and group of a post written by `actor`.
    pub async fn edit_post(
        &self,
        post_id: PostId,
        input: PostInput,
        actor: &Actor,
    ) -> Result<Post, DomainError> {
        let mut post = self.edit_form(post_id, actor).await?;
        let values = validate_post(input, self.groups.as_ref()).await?;

        post.apply(values);
        let post = self.posts.update(post).await?;
        tracing::info!(post_id = post.id, "Post updated");
        Ok(post)
    }

    async fn find_post(&self, post_id: PostId) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    fn check_author(&self, actor: &Actor, post: &Post) -> Result<(), DomainError> {
        ensure_can_edit(actor, post).inspect_err(|_| {
            tracing::warn!(
                post_id = post.id,
                actor_id = ?actor.user_id(),
                "Edit refused: actor is not the author"
            );
        })
    }

    async fn feed(&self, filter: PostFilter, page: i64) -> Result<Page<PostEntry>, DomainError> {
        let mut listed = self.posts.find_page(filter, page, self.page_size).await?;
        tracing::debug!(
            ?filter,
            requested = page,
            number = listed.number,
            total = listed.total_items,
            "Listing posts"
        );

        let posts = std::mem::take(&mut listed.items);
        let items = self.resolve(posts).await?;
        Ok(listed.with_items(items))
    }

    /// Attach author and group records to each post.
    async fn resolve(&self, posts: Vec<Post>) -> Result<Vec<PostEntry>, DomainError> {
        let mut authors: HashMap<UserId, Author> = HashMap::new();
        let mut groups: HashMap<GroupId, Option<Group>> = HashMap::new();
        let mut entries = Vec::with_capacity(posts.len());

        for post in posts {
            if !authors.contains_key(&post.author_id) {
                let user = self.users.find_by_id(post.author_id).await?.ok_or_else(|| {
                    DomainError::Internal(format!(
                        "Post {} references missing user {}",
                        post.id, post.author_id
                    ))
                })?;
                authors.insert(user.id, author_of(&user));
            }

            let group = match post.group_id {
                Some(group_id) => {
                    if !groups.contains_key(&group_id) {
                        let found = self.groups.find_by_id(group_id).await?;
                        groups.insert(group_id, found);
                    }
                    groups.get(&group_id).cloned().flatten()
                }
                None => None,
            };

            entries.push(PostEntry {
                author: authors[&post.author_id].clone(),
                group,
                post,
            });
        }

        Ok(entries)
    }
}

fn author_of(user: &User) -> Author {
    Author {
        id: user.id,
        username: user.username.clone(),
    }
}
