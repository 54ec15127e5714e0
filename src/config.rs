//! Process configuration from environment variables (after `dotenvy`), with local development defaults.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// `DATABASE_URL`; takes precedence over the individual fields when set.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()));
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub store: StoreKind,
    /// API listening port (`PORT`).
    pub port: u16,
    /// Serve GraphiQL on `GET /graphql`.
    pub playground: bool,
    /// Where to write the generated SDL at startup, if anywhere.
    pub schema_file: Option<PathBuf>,
    pub max_body_bytes: usize,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let store = match lookup("STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Settings {
            database: DatabaseSettings {
                host: text("POSTGRES_HOST", "localhost"),
                port: parse(&lookup, "POSTGRES_PORT", 5432)?,
                username: text("POSTGRES_USER", "dev"),
                password: text("POSTGRES_PASSWORD", "devpass"),
                database: text("POSTGRES_DB", "petdb"),
                url: lookup("DATABASE_URL").filter(|u| !u.is_empty()),
                max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            },
            store,
            port: parse(&lookup, "PORT", 3000)?,
            playground: parse_bool(&lookup, "GRAPHQL_PLAYGROUND", true)?,
            schema_file: lookup("SCHEMA_FILE").filter(|p| !p.is_empty()).map(PathBuf::from),
            max_body_bytes: parse(&lookup, "MAX_BODY_BYTES", 1024 * 1024)?,
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        },
    }
}
