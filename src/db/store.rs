use crate::db::models::AdminCredential;
use crate::error::StoreError;
use async_trait::async_trait;

/// Narrow lookup/insert contract over the admin credential table.
///
/// A missing row is `Ok(None)`; every `Err` is a real store failure and is
/// propagated to the caller untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Point-read of the credential row for `email`.
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError>;

    /// Insert a new credential row. Duplicate emails are rejected by the backend.
    async fn insert(&self, credential: &AdminCredential) -> Result<(), StoreError>;
}
