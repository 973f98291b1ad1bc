use crate::db::models::{ADMIN_TABLE, AdminCredential};
use crate::db::store::CredentialStore;
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;
use url::Url;

const SELECT_COLUMNS: &str = "email,password_hash";

/// Credential store backed by a hosted PostgREST-style table (`/rest/v1/<table>`).
///
/// Every call is a single attempt; timeouts come from the HTTP client.
#[derive(Clone)]
pub struct PostgrestCredentialStore {
    client: reqwest::Client,
    table_url: Url,
}

impl PostgrestCredentialStore {
    /// Build the store with a preconfigured HTTP client carrying the API key.
    pub fn new(base_url: &Url, api_key: &str, proxy: Option<&Url>) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))?,
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("admin-gate/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .default_headers(headers);
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            table_url: table_url(base_url)?,
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn lookup_url(&self, email: &str) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", SELECT_COLUMNS)
            .append_pair("email", &format!("eq.{email}"))
            .append_pair("limit", "1");
        url
    }
}

/// `<base>/rest/v1/admin_users`, tolerating a trailing slash on the base.
fn table_url(base_url: &Url) -> Result<Url, StoreError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("rest/v1/{ADMIN_TABLE}"))?)
}

async fn reject(resp: reqwest::Response) -> StoreError {
    let status = resp.status();
    let message = resp.text().await.unwrap_or_default();
    StoreError::upstream(status, message)
}

#[async_trait]
impl CredentialStore for PostgrestCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError> {
        let resp = self
            .client
            .get(self.lookup_url(email))
            .header("Accept", "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(reject(resp).await);
        }

        let body = resp.bytes().await?;
        let rows: Vec<AdminCredential> = serde_json::from_slice(&body)?;
        debug!(email = %email, rows = rows.len(), "admin credential lookup");
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, credential: &AdminCredential) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.table_url.clone())
            .header("Prefer", "return=minimal")
            .json(credential)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(reject(resp).await);
        }
        Ok(())
    }
}
