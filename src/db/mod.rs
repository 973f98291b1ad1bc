//! Credential storage: the admin credential model, the store contract and its backends.
//!
//! Layout:
//! - `models.rs`: `AdminCredential`, the row shared by every backend
//! - `schema.rs`: SQL DDL for initializing the SQLite table
//! - `store.rs`: the `CredentialStore` contract the auth manager depends on
//! - `sqlite.rs`: local SQLite backend (sqlx)
//! - `postgrest.rs`: hosted REST table backend (reqwest)

pub mod models;
pub mod postgrest;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use models::{ADMIN_TABLE, AdminCredential};
pub use postgrest::PostgrestCredentialStore;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqliteCredentialStore, SqlitePool};
pub use store::CredentialStore;
