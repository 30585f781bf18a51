//! User repository for database operations.

use sqlx::SqlitePool;

use quill_core::{Email, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::User;

/// Raw `users` row as stored.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    name: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            name: row.name,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name
            FROM users
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (email, password_hash, name)
            VALUES (?1, ?2, ?3)
            RETURNING id, email, name
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "email already exists"))?;

        User::try_from(row)
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (UserId, String, String, String)>(
            r"
            SELECT id, email, name, password_hash
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, email, name, password_hash)) = row else {
            return Ok(None);
        };

        let user = User::try_from(UserRow { id, email, name })?;
        Ok(Some((user, password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = test_support::pool().await;
        let users = UserRepository::new(&pool);

        let created = users
            .create(&email("alice@example.com"), "Alice", "$argon2id$fake")
            .await
            .unwrap();
        assert_eq!(created.name, "Alice");

        let by_id = users.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let (by_email, _) = users
            .get_password_hash(&email("alice@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email, created);
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let pool = test_support::pool().await;
        let users = UserRepository::new(&pool);

        assert!(users.get_by_id(UserId::new(99)).await.unwrap().is_none());
        assert!(
            users
                .get_password_hash(&email("nobody@example.com"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let pool = test_support::pool().await;
        let users = UserRepository::new(&pool);

        users
            .create(&email("alice@example.com"), "Alice", "hash-1")
            .await
            .unwrap();
        let err = users
            .create(&email("alice@example.com"), "Other Alice", "hash-2")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let pool = test_support::pool().await;
        let users = UserRepository::new(&pool);

        users
            .create(&email("alice@example.com"), "Alice", "hash")
            .await
            .unwrap();
        assert!(
            users
                .get_password_hash(&email("Alice@Example.com"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_get_password_hash() {
        let pool = test_support::pool().await;
        let users = UserRepository::new(&pool);

        let created = users
            .create(&email("alice@example.com"), "Alice", "stored-hash")
            .await
            .unwrap();

        let (user, hash) = users
            .get_password_hash(&email("alice@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user, created);
        assert_eq!(hash, "stored-hash");
    }
}
