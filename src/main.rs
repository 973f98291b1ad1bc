use admin_gate::SessionLookup;
use admin_gate::auth::{AdminAuthManager, FileSessionStore, SessionStore};
use admin_gate::config::{Backend, Config};
use admin_gate::db::{CredentialStore, PostgrestCredentialStore, SqliteCredentialStore};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const MISSING_POSTGREST: &str =
    "postgrest backend needs ADMIN_GATE_POSTGREST_URL and ADMIN_GATE_POSTGREST_KEY";

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        backend = ?cfg.backend,
        database_url = %cfg.database_url,
        postgrest_url = %cfg.postgrest_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        session_dir = %cfg.session_dir.display(),
        loglevel = %cfg.loglevel
    );

    let sessions = FileSessionStore::new(cfg.session_dir.clone())?;

    match cfg.backend {
        Backend::Sqlite => {
            let store = SqliteCredentialStore::connect(&cfg.database_url).await?;
            startup(AdminAuthManager::new(store, sessions), &cfg).await
        }
        Backend::Postgrest => {
            let (Some(url), Some(key)) =
                (cfg.postgrest_url.as_ref(), cfg.postgrest_key.as_deref())
            else {
                return Err(MISSING_POSTGREST.into());
            };
            let store = PostgrestCredentialStore::new(url, key, cfg.proxy.as_ref())?;
            startup(AdminAuthManager::new(store, sessions), &cfg).await
        }
    }
}

/// Ensure the configured admin exists and report the local session state.
async fn startup<C, S>(
    manager: AdminAuthManager<C, S>,
    cfg: &Config,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: CredentialStore,
    S: SessionStore,
{
    match cfg.admin_seed() {
        Some((email, password)) => {
            manager.initialize_admin(email, password).await?;
            info!(email = %email, "admin credential ensured");
        }
        None => {
            warn!(
                "ADMIN_GATE_ADMIN_EMAIL/ADMIN_GATE_ADMIN_PASSWORD not set; \
                 skipping admin initialization"
            );
        }
    }

    match manager.lookup_session() {
        SessionLookup::Active(session) => info!(email = %session.email, "admin session active"),
        SessionLookup::Absent => info!("no admin session"),
        SessionLookup::Malformed => {
            warn!("stored admin session is unreadable; treated as logged out")
        }
    }
    Ok(())
}
