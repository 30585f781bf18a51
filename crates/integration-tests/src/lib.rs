//! Integration tests for Quill.
//!
//! Each test spawns the real router on an ephemeral port over a private
//! in-memory SQLite database and drives it over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quill-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Registration, login and logout
//! - `posts` - Listing, authoring, editing and deletion
//! - `comments` - Commenting and post/redirect/get

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{Ipv4Addr, SocketAddr};

use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use sqlx::SqlitePool;

use quill_core::PostId;
use quill_web::config::QuillConfig;
use quill_web::db;
use quill_web::routes;
use quill_web::state::AppState;

/// A running server plus a cookie-keeping client pointed at it.
pub struct TestApp {
    pub address: SocketAddr,
    pub client: Client,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Start a fresh server with an empty, migrated database.
    pub async fn spawn() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create in-memory pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Listener has no address");

        let config = QuillConfig {
            database_url: SecretString::from("sqlite::memory:".to_owned()),
            host: address.ip(),
            port: address.port(),
            base_url: format!("http://{address}"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        };
        let app = routes::app(AppState::new(config, pool.clone()));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            address,
            client: new_client(),
            pool,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// GET a path with the given client.
    pub async fn get(&self, client: &Client, path: &str) -> Response {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to a path with the given client.
    pub async fn post_form(&self, client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Register an account; the client ends up logged in on success.
    pub async fn register(
        &self,
        client: &Client,
        email: &str,
        password: &str,
        name: &str,
    ) -> Response {
        self.post_form(
            client,
            "/register",
            &[("email", email), ("password", password), ("name", name)],
        )
        .await
    }

    /// Log in with an existing account.
    pub async fn login(&self, client: &Client, email: &str, password: &str) -> Response {
        self.post_form(client, "/login", &[("email", email), ("password", password)])
            .await
    }

    /// Create a post with fixed subtitle, body and image.
    pub async fn create_post(&self, client: &Client, title: &str) -> Response {
        self.post_form(
            client,
            "/new-post",
            &[
                ("title", title),
                ("subtitle", "World"),
                ("body", "..."),
                ("img_url", "http://x/y.png"),
            ],
        )
        .await
    }

    /// Look up a post's ID by its title.
    pub async fn post_id(&self, title: &str) -> PostId {
        sqlx::query_scalar("SELECT id FROM posts WHERE title = ?1")
            .bind(title)
            .fetch_one(&self.pool)
            .await
            .expect("Post not found")
    }

    /// Count rows in a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Count query failed")
    }
}

/// A client with its own cookie jar that does not follow redirects.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
