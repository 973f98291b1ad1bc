use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Table holding admin credentials, keyed by email.
pub const ADMIN_TABLE: &str = "admin_users";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminCredential {
    pub email: String,
    /// Lower-case hex SHA-256 of the password.
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminCredential {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_payload_omits_missing_timestamp() {
        let cred = AdminCredential::new("admin@x.com", "ab12");
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "admin@x.com", "password_hash": "ab12"})
        );
    }

    #[test]
    fn rows_without_timestamp_deserialize() {
        let cred: AdminCredential =
            serde_json::from_str(r#"{"email":"a@x.com","password_hash":"ff"}"#).unwrap();
        assert_eq!(cred, AdminCredential::new("a@x.com", "ff"));
    }
}
