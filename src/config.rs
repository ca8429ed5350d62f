use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Where the Postgres store lives.
#[derive(Debug, Clone)]
pub enum DbTarget {
    Url(String),
    /// Assembled from the `DB_*` variables, so credentials never pass through
    /// URL parsing.
    Parts(PgConnectOptions),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the service on the in-memory store.
    pub database: Option<DbTarget>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "usergate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "usergate-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };

        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("APP_PORT"))
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("invalid port: {e}"))?;

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            database: database_target(|key| std::env::var(key).ok())?,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }
}

/// `DATABASE_URL` wins; otherwise the target is assembled from the `DB_*`
/// parts, all of which (except `DB_SSLMODE`) must be present and non-empty.
fn database_target(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Option<DbTarget>> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get("DATABASE_URL") {
        return Ok(Some(DbTarget::Url(url)));
    }

    let (Some(host), Some(port), Some(user), Some(password), Some(name)) = (
        get("DB_HOST"),
        get("DB_PORT"),
        get("DB_USER"),
        get("DB_PASSWORD"),
        get("DB_NAME"),
    ) else {
        return Ok(None);
    };

    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|e| anyhow::anyhow!("invalid DB_PORT: {e}"))?;
    let ssl_mode = get("DB_SSLMODE")
        .unwrap_or_else(|| "disable".into())
        .parse::<PgSslMode>()
        .map_err(|e| anyhow::anyhow!("invalid DB_SSLMODE: {e}"))?;

    let options = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .password(&password)
        .database(&name)
        .ssl_mode(ssl_mode);
    Ok(Some(DbTarget::Parts(options)))
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
