use anyhow::Context;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

/// Shared database connection type for the driver.
pub type Connection = Pool<MySql>;

/// Character set applied to every session as part of connection setup.
const SESSION_CHARSET: &str = "utf8";

/// Backing-store connection settings.
///
/// Each field falls back to its default independently when the source value
/// is missing or malformed; a half-configured environment still yields a
/// usable config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
        }
    }
}

impl StoreConfig {
    /// Read settings from `BAR_DB_HOST` / `BAR_DB_PORT` / `BAR_DB_USER` /
    /// `BAR_DB_PASSWORD`, defaulting each field individually.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("BAR_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("BAR_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            user: std::env::var("BAR_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("BAR_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .charset(SESSION_CHARSET)
    }
}

/// Best-effort: load environment variables from .env before reading config.
fn load_env_best_effort() {
    let _ = dotenvy::from_filename(".env").or_else(|_| dotenvy::from_filename(".env.example"));
}

fn pool_options() -> MySqlPoolOptions {
    // One connection serializes all operations: the driver serves one
    // logical caller at a time.
    MySqlPoolOptions::new().max_connections(
        std::env::var("BAR_DB_MAX_CONNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1),
    )
}

/// Open a pool and establish one live connection. All-or-nothing: a connect
/// or session-setup failure aborts initialization.
pub async fn connect(config: &StoreConfig) -> anyhow::Result<Connection> {
    let pool = pool_options()
        .connect_with(config.connect_options())
        .await
        .with_context(|| format!("failed to connect to mysql at {}:{}", config.host, config.port))?;
    Ok(pool)
}

/// Open a pool without probing the server. Connectivity failures surface on
/// first use, where the lenient query surface degrades them to empty
/// results; callers are expected to detect connectivity separately.
pub fn connect_lazy(config: &StoreConfig) -> Connection {
    pool_options().connect_lazy_with(config.connect_options())
}

/// Initialize a pool from the environment: `DATABASE_URL` (a full `mysql://`
/// URL) when set, otherwise the individual `BAR_DB_*` variables.
pub async fn pool_from_env() -> anyhow::Result<Connection> {
    load_env_best_effort();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let opts: MySqlConnectOptions = url
            .parse()
            .with_context(|| format!("invalid DATABASE_URL '{url}'"))?;
        let pool = pool_options()
            .connect_with(opts.charset(SESSION_CHARSET))
            .await
            .context("failed to connect to mysql from DATABASE_URL")?;
        return Ok(pool);
    }
    connect(&StoreConfig::from_env()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
        assert_eq!(config.password, "");
    }

    #[test]
    fn env_fields_fall_back_individually() {
        std::env::set_var("BAR_DB_HOST", "db.internal");
        std::env::set_var("BAR_DB_PORT", "not-a-port");
        let config = StoreConfig::from_env();
        std::env::remove_var("BAR_DB_HOST");
        std::env::remove_var("BAR_DB_PORT");
        assert_eq!(config.host, "db.internal");
        // Malformed port falls back alone; the host override stands.
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
    }
}
