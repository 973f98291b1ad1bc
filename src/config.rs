use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Optional config file read from the working directory.
pub const CONFIG_FILE: &str = "admin-gate.toml";

/// Environment prefix, e.g. `ADMIN_GATE_DATABASE_URL`.
pub const ENV_PREFIX: &str = "ADMIN_GATE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Postgrest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub loglevel: String,
    pub backend: Backend,
    pub database_url: String,
    pub postgrest_url: Option<Url>,
    pub postgrest_key: Option<String>,
    pub proxy: Option<Url>,
    pub session_dir: PathBuf,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            backend: Backend::Sqlite,
            database_url: "sqlite:admin-gate.sqlite".to_string(),
            postgrest_url: None,
            postgrest_key: None,
            proxy: None,
            session_dir: PathBuf::from(".admin-gate"),
            admin_email: None,
            admin_password: None,
        }
    }
}

impl Config {
    /// Defaults, then `admin-gate.toml`, then `ADMIN_GATE_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Admin credentials to ensure at startup, when both halves are configured.
    pub fn admin_seed(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() => Some((email, password)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_sqlite() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(cfg.backend, Backend::Sqlite);
        assert_eq!(cfg.loglevel, "info");
        assert!(cfg.admin_seed().is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                backend = "postgrest"
                postgrest_url = "https://db.example.com"
                postgrest_key = "anon"
                admin_email = "admin@x.com"
                admin_password = "secret"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(cfg.backend, Backend::Postgrest);
        assert_eq!(
            cfg.postgrest_url.as_ref().map(Url::as_str),
            Some("https://db.example.com/")
        );
        assert_eq!(cfg.admin_seed(), Some(("admin@x.com", "secret")));
    }

    #[test]
    fn admin_seed_requires_both_halves() {
        let cfg = Config {
            admin_email: Some("admin@x.com".to_string()),
            ..Config::default()
        };
        assert!(cfg.admin_seed().is_none());
    }
}
