//! Comment domain types.

use quill_core::{CommentId, PostId};

use super::Author;

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub text: String,
    pub author: Author,
}
