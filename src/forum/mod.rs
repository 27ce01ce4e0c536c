//! Forum module for Agora.
//!
//! This module provides the discussion forum functionality including:
//! - Post management (create, read, delete)
//! - Comment management attached to posts
//! - Account editing, deletion, and password recovery
//! - Broadcast events for new posts and comments

mod comment;
mod comment_repository;
mod events;
mod post;
mod post_repository;
mod service;

pub use comment::{Comment, NewComment};
pub use comment_repository::CommentRepository;
pub use events::{channel, ForumEvent};
pub use post::{NewPost, Post};
pub use post_repository::PostRepository;
pub use service::{
    ForumService, ForumStats, MAX_COMMENT_LENGTH, MAX_SUBTITLE_LENGTH, MAX_TITLE_LENGTH,
};
