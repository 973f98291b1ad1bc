use crate::db::models::AdminCredential;
use crate::db::schema::SQLITE_INIT;
use crate::db::store::CredentialStore;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        debug!(database_url = %database_url, "sqlite credential store ready");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<AdminCredential, StoreError> {
        let email: String = row.try_get("email")?;
        let password_hash: String = row.try_get("password_hash")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(AdminCredential {
            email,
            password_hash,
            created_at: Some(created_at),
        })
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, StoreError> {
        let row = sqlx::query(
            "SELECT email, password_hash, created_at FROM admin_users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    async fn insert(&self, credential: &AdminCredential) -> Result<(), StoreError> {
        let created_at = credential.created_at.unwrap_or_else(Utc::now).to_rfc3339();
        sqlx::query("INSERT INTO admin_users (email, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(&credential.email)
            .bind(&credential.password_hash)
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
