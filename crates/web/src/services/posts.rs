//! Post and comment service.
//!
//! Wraps the post, comment and user repositories and enforces that only a
//! post's author may change or remove it.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

use quill_core::{PostId, UserId};

use crate::db::{CommentRepository, PostRepository, RepositoryError, UserRepository};
use crate::models::{Comment, Post, PostContent, User};

/// Display format for post dates, e.g. "October 19, 2026".
const POST_DATE_FORMAT: &str = "%B %d, %Y";

/// Errors that can occur during post operations.
#[derive(Debug, Error)]
pub enum PostError {
    /// The post (or user) does not exist.
    #[error("not found")]
    NotFound,

    /// The acting user did not write the post.
    #[error("only the author may change this post")]
    NotAuthor,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for PostError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// Format a calendar date the way posts display it.
#[must_use]
pub fn format_post_date(date: NaiveDate) -> String {
    date.format(POST_DATE_FORMAT).to_string()
}

/// Post service.
pub struct PostService<'a> {
    posts: PostRepository<'a>,
    comments: CommentRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> PostService<'a> {
    /// Create a new post service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            posts: PostRepository::new(pool),
            comments: CommentRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// Every post, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `PostError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.list_all().await?)
    }

    /// A user together with the posts they wrote.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the user does not exist.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<(User, Vec<Post>), PostError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(PostError::NotFound)?;
        let posts = self.posts.list_by_author(user_id).await?;
        Ok((user, posts))
    }

    /// A post and its comments, oldest comment first.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the post does not exist.
    pub async fn get_with_comments(&self, id: PostId) -> Result<(Post, Vec<Comment>), PostError> {
        let post = self.posts.get_by_id(id).await?.ok_or(PostError::NotFound)?;
        let comments = self.comments.list_for_post(id).await?;
        Ok((post, comments))
    }

    /// Leave a comment on a post.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the post does not exist.
    pub async fn add_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        text: &str,
    ) -> Result<Comment, PostError> {
        let comment = self.comments.create(post_id, author_id, text).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Publish a new post dated today.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the author does not exist.
    pub async fn create(&self, author_id: UserId, content: &PostContent) -> Result<Post, PostError> {
        let date = format_post_date(Utc::now().date_naive());
        let post = self.posts.create(author_id, &date, content).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Load a post for modification by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the post does not exist.
    /// Returns `PostError::NotAuthor` if `user_id` did not write it.
    pub async fn authorize_author(&self, id: PostId, user_id: UserId) -> Result<Post, PostError> {
        let post = self.posts.get_by_id(id).await?.ok_or(PostError::NotFound)?;
        if !post.is_authored_by(user_id) {
            return Err(PostError::NotAuthor);
        }
        Ok(post)
    }

    /// Replace a post's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the post does not exist.
    /// Returns `PostError::NotAuthor` if `user_id` did not write it.
    pub async fn update(
        &self,
        id: PostId,
        user_id: UserId,
        content: &PostContent,
    ) -> Result<(), PostError> {
        self.authorize_author(id, user_id).await?;
        self.posts.update(id, content).await?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(())
    }

    /// Delete a post and its comments.
    ///
    /// # Errors
    ///
    /// Returns `PostError::NotFound` if the post does not exist.
    /// Returns `PostError::NotAuthor` if `user_id` did not write it.
    pub async fn delete(&self, id: PostId, user_id: UserId) -> Result<(), PostError> {
        self.authorize_author(id, user_id).await?;
        if !self.posts.delete(id).await? {
            return Err(PostError::NotFound);
        }
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}
