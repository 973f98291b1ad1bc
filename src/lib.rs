pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use auth::{AdminAuthManager, AdminSession, SessionLookup};
pub use error::StoreError;
