use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::storage::StoreConfig;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 20;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from `.env`, disk and environment.
    ///
    /// Database credentials come from `USER_ID` / `USER_PASSWORD` unless the
    /// config file or `HRMS_DATABASE__*` already set them.
    pub fn load() -> Result<Self> {
        // A missing .env is fine as long as the variables are set some other way
        ignore_missing_env_file(dotenvy::dotenv())?;

        let config_path = env::var("HRMS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("HRMS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.database.user.is_empty() {
            if let Ok(user) = env::var("USER_ID") {
                config.database.user = user;
            }
        }
        if config.database.password.is_empty() {
            if let Ok(password) = env::var("USER_PASSWORD") {
                config.database.password = password;
            }
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Validate the database section and resolve the store configuration.
    pub fn store_runtime(&self) -> Result<StoreConfig> {
        self.database.to_runtime()
    }
}

/// Treat an absent `.env` as empty; anything else (bad syntax, unreadable
/// file) fails startup.
fn ignore_missing_env_file<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Err(e) if !e.not_found() => Err(e).context("failed to load .env"),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub backend: StoreBackendKind,
    /// Full connection string; skips building one from the parts below
    pub uri: Option<String>,
    pub user: String,
    pub password: String,
    pub cluster_host: String,
    pub name: String,
    pub app_name: String,
    pub collection: String,
    pub connect_timeout_secs: u64,
}

impl DatabaseSection {
    /// `mongodb+srv` connection string with the credentials embedded.
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb+srv://{}:{}@{}/{}?retryWrites=true&w=majority&appName={}",
            self.user, self.password, self.cluster_host, self.name, self.app_name
        )
    }

    pub fn to_runtime(&self) -> Result<StoreConfig> {
        match self.backend {
            StoreBackendKind::Memory => Ok(StoreConfig::Memory),
            StoreBackendKind::Mongo => {
                if self.connect_timeout_secs == 0 {
                    bail!("database.connect_timeout_secs must be greater than zero");
                }
                if self.name.trim().is_empty() {
                    bail!("database.name must be specified");
                }
                if self.collection.trim().is_empty() {
                    bail!("database.collection must be specified");
                }

                let uri = match self.uri.as_deref().map(str::trim) {
                    Some(uri) if !uri.is_empty() => uri.to_string(),
                    _ => {
                        if self.user.is_empty() {
                            bail!("USER_ID must be set for the mongo backend");
                        }
                        if self.password.is_empty() {
                            bail!("USER_PASSWORD must be set for the mongo backend");
                        }
                        if self.cluster_host.trim().is_empty() {
                            bail!("database.cluster_host must be specified");
                        }
                        self.connection_uri()
                    }
                };

                Ok(StoreConfig::Mongo {
                    uri,
                    database: self.name.clone(),
                    collection: self.collection.clone(),
                    connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                })
            }
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Mongo,
            uri: None,
            user: String::new(),
            password: String::new(),
            cluster_host: "cluster0.sqm6wpi.mongodb.net".to_string(),
            name: "fiber-hrms".to_string(),
            app_name: "Cluster0".to_string(),
            collection: "employees".to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
