//! Post repository for database operations.
//!
//! Posts are always loaded joined with their author's display name.

use sqlx::SqlitePool;

use quill_core::{PostId, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::{Author, Post, PostContent};

/// `posts` row joined with `users.name`.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: PostId,
    title: String,
    subtitle: String,
    date: String,
    body: String,
    img_url: String,
    author_id: UserId,
    author_name: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
            date: row.date,
            body: row.body,
            img_url: row.img_url,
            author: Author {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

const SELECT_POSTS: &str = r"
    SELECT p.id, p.title, p.subtitle, p.date, p.body, p.img_url,
           p.author_id, u.name AS author_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
";

/// Repository for post database operations.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every post in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POSTS} ORDER BY p.id ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// List the posts written by one user, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{SELECT_POSTS} WHERE p.author_id = ?1 ORDER BY p.id ASC"
        ))
        .bind(author_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Get a post by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POSTS} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    /// Insert a new post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the author does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        author_id: UserId,
        date: &str,
        content: &PostContent,
    ) -> Result<Post, RepositoryError> {
        let id: PostId = sqlx::query_scalar(
            r"
            INSERT INTO posts (title, subtitle, date, body, img_url, author_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            ",
        )
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(date)
        .bind(&content.body)
        .bind(&content.img_url)
        .bind(author_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "post already exists"))?;

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Overwrite the editable fields of a post in place.
    ///
    /// The id, author and date are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: PostId, content: &PostContent) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = ?1, subtitle = ?2, body = ?3, img_url = ?4
            WHERE id = ?5
            ",
        )
        .bind(&content.title)
        .bind(&content.subtitle)
        .bind(&content.body)
        .bind(&content.img_url)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a post and all of its comments in one transaction.
    ///
    /// # Returns
    ///
    /// Returns `true` if the post was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: PostId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE post_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quill_core::Email;

    use super::*;
    use crate::db::test_support;
    use crate::db::{CommentRepository, UserRepository};
    use crate::models::User;

    fn content(title: &str) -> PostContent {
        PostContent {
            title: title.to_string(),
            subtitle: "Subtitle".to_string(),
            body: "Body text".to_string(),
            img_url: "https://example.com/cover.png".to_string(),
        }
    }

    async fn user(pool: &SqlitePool, email: &str, name: &str) -> User {
        UserRepository::new(pool)
            .create(&Email::parse(email).unwrap(), name, "hash")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_joins_author() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com", "Alice").await;
        let posts = PostRepository::new(&pool);

        let post = posts
            .create(alice.id, "October 19, 2026", &content("Hello"))
            .await
            .unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, "October 19, 2026");
        assert_eq!(post.author.id, alice.id);
        assert_eq!(post.author.name, "Alice");
    }

    #[tokio::test]
    async fn test_create_for_missing_author_is_not_found() {
        let pool = test_support::pool().await;
        let err = PostRepository::new(&pool)
            .create(UserId::new(42), "October 19, 2026", &content("Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_and_filters_by_author() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com", "Alice").await;
        let bob = user(&pool, "bob@example.com", "Bob").await;
        let posts = PostRepository::new(&pool);

        let first = posts.create(alice.id, "d", &content("First")).await.unwrap();
        let second = posts.create(bob.id, "d", &content("Second")).await.unwrap();
        let third = posts.create(alice.id, "d", &content("Third")).await.unwrap();

        let all: Vec<PostId> = posts.list_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(all, vec![first.id, second.id, third.id]);

        let alices: Vec<PostId> = posts
            .list_by_author(alice.id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(alices, vec![first.id, third.id]);
    }

    #[tokio::test]
    async fn test_update_preserves_identity_author_and_date() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com", "Alice").await;
        let posts = PostRepository::new(&pool);
        let post = posts
            .create(alice.id, "January 02, 2026", &content("Before"))
            .await
            .unwrap();

        let changes = PostContent {
            title: "After".to_string(),
            subtitle: "New subtitle".to_string(),
            body: "New body".to_string(),
            img_url: "https://example.com/new.png".to_string(),
        };
        posts.update(post.id, &changes).await.unwrap();

        let updated = posts.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.author, post.author);
        assert_eq!(updated.date, "January 02, 2026");
        assert_eq!(updated.content(), changes);
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let pool = test_support::pool().await;
        let err = PostRepository::new(&pool)
            .update(PostId::new(7), &content("Nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_comments() {
        let pool = test_support::pool().await;
        let alice = user(&pool, "alice@example.com", "Alice").await;
        let posts = PostRepository::new(&pool);
        let comments = CommentRepository::new(&pool);

        let post = posts.create(alice.id, "d", &content("Doomed")).await.unwrap();
        comments.create(post.id, alice.id, "first!").await.unwrap();

        assert!(posts.delete(post.id).await.unwrap());
        assert!(posts.get_by_id(post.id).await.unwrap().is_none());
        assert!(comments.list_for_post(post.id).await.unwrap().is_empty());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);

        assert!(!posts.delete(post.id).await.unwrap());
    }
}
