//! Application services composing the ports.

mod posts;

pub use posts::{GroupFeed, PostDetail, PostService, ProfileFeed};
