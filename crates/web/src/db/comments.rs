//! Comment repository for database operations.

use sqlx::SqlitePool;

use quill_core::{CommentId, PostId, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::{Author, Comment};

/// `comments` row joined with `users.name`.
#[derive(sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    post_id: PostId,
    text: String,
    author_id: UserId,
    author_name: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            author: Author {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

const SELECT_COMMENTS: &str = r"
    SELECT c.id, c.post_id, c.text, c.author_id, u.name AS author_name
    FROM comments c
    JOIN users u ON u.id = c.author_id
";

/// Repository for comment database operations.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the comments on a post, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{SELECT_COMMENTS} WHERE c.post_id = ?1 ORDER BY c.id ASC"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Add a comment to a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post or author does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        post_id: PostId,
        author_id: UserId,
        text: &str,
    ) -> Result<Comment, RepositoryError> {
        let id: CommentId = sqlx::query_scalar(
            r"
            INSERT INTO comments (text, author_id, post_id)
            VALUES (?1, ?2, ?3)
            RETURNING id
            ",
        )
        .bind(text)
        .bind(author_id)
        .bind(post_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "comment already exists"))?;

        let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENTS} WHERE c.id = ?1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(Comment::from(row))
    }
}
