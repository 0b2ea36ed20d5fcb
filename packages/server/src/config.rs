use common::StorageConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Config file read when `ATELIER_CONFIG` is unset (extension optional).
pub const DEFAULT_CONFIG_FILE: &str = "config/config";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours.
    pub token_ttl_hours: i64,
}

/// Process-wide settings, built once in `main` and handed to whoever needs them.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load from `$ATELIER_CONFIG` (or `config/config.toml`) with
    /// `ATELIER__*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path(std::env::var("ATELIER_CONFIG").ok());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: &str, env: Environment) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()?;

        s.try_deserialize()
    }
}

/// Config file to read: the `ATELIER_CONFIG` value when set and non-empty.
fn config_path(from_env: Option<String>) -> String {
    from_env
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into())
}

/// Environment overlay, e.g. `ATELIER__AUTH__JWT_SECRET`.
///
/// `ATELIER__SERVER__CORS__ALLOW_ORIGINS` takes a comma-separated list.
fn environment() -> Environment {
    Environment::with_prefix("ATELIER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors.allow_origins")
}
