//! Domain entities - the core business objects.

mod actor;
mod group;
mod post;
mod user;

pub use actor::Actor;
pub use group::{Group, GroupId, NewGroup, is_valid_slug};
pub use post::{Author, NewPost, POST_SUMMARY_CHARS, Post, PostEntry, PostId};
pub use user::{NewUser, USERNAME_MAX_LEN, User, UserId, is_valid_username};
