//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! posts, groups and users, the post form, pagination, the edit policy and the
//! [`PostService`](service::PostService) that composes them.

pub mod domain;
pub mod error;
pub mod form;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, Paginator};
pub use service::PostService;
