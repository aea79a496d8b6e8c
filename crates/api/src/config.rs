//! Process configuration read from the environment (after `.env`).

use thiserror::Error;

use hireboard_auth::token::DEFAULT_TOKEN_TTL_HOURS;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub token_ttl_hours: i64,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            use_persistent_stores: false,
            database_url: None,
        }
    }
}

impl ApiConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = match var("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        let port = match var("API_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "API_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let token_ttl_hours = match var("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "TOKEN_TTL_HOURS",
                        value: raw,
                    });
                }
            },
            None => defaults.token_ttl_hours,
        };

        let use_persistent_stores = var("USE_PERSISTENT_STORES")
            .map(|raw| raw.trim().parse::<bool>().unwrap_or(false))
            .unwrap_or(false);

        let database_url = var("DATABASE_URL").filter(|s| !s.is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            jwt_secret,
            host: var("API_HOST").unwrap_or(defaults.host),
            port,
            token_ttl_hours,
            use_persistent_stores,
            database_url,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
