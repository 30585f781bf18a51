//! Quill blog web application library.
//!
//! The binary in `main.rs` wires configuration, Sentry and tracing around
//! [`routes::app`]; the library form lets the CLI and integration tests
//! reuse the same database, service and router code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
