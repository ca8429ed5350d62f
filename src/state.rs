use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{gate::TokenVerifier, jwt::JwtKeys};
use crate::config::{AppConfig, DbTarget};
use crate::users::{memory::MemoryUserStore, repo::PgUserStore, repo::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub keys: Arc<JwtKeys>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to Postgres and applies migrations, or falls back to the
    /// in-memory store when no database is configured.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = match &config.database {
            Some(target) => {
                let pool = PgPoolOptions::new().max_connections(config.max_connections);
                let db = match target {
                    DbTarget::Url(url) => pool.connect(url).await,
                    DbTarget::Parts(options) => pool.connect_with(options.clone()).await,
                }
                .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                tracing::info!("using postgres user store");
                Arc::new(PgUserStore::new(db))
            }
            None => {
                tracing::warn!("no database configured; users are kept in memory only");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        let keys = Arc::new(JwtKeys::from_config(&config.jwt));
        let verifier = Arc::clone(&keys) as Arc<dyn TokenVerifier>;
        Self {
            store,
            keys,
            verifier,
            config,
        }
    }

    /// Swaps the token verification strategy used by the authorization gate.
    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// In-memory state with a fixed test secret.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database: None,
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            cors_origins: Vec::new(),
        });
        Self::from_parts(Arc::new(MemoryUserStore::new()), config)
    }
}
