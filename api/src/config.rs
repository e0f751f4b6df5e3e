//! Configuration for the API server

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors_allow_any: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                path: PathBuf::from("db/quran.db"),
            },
            cors_allow_any: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid SERVER_PORT {:?}, using {}", raw, defaults.server.port);
                defaults.server.port
            }),
            None => defaults.server.port,
        };

        let cors_allow_any = match lookup("CORS_ALLOW_ANY").as_deref() {
            Some("false") | Some("0") => false,
            Some(_) | None => defaults.cors_allow_any,
        };

        Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            database: DatabaseConfig {
                path: lookup("QURAN_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.database.path),
            },
            cors_allow_any,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
