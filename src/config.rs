use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded audio files are stored in.
    pub media_dir: String,
    /// Directory the playlist and station JSON documents are written to.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: "media".to_string(),
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Base level for the default filter, e.g. "info".
    pub level: Option<String>,
    /// Extra per-target directives, e.g. "hyper=warn,axum=debug".
    pub filters: Option<String>,
}

impl LoggingConfig {
    /// The default `EnvFilter` directive string: the base level followed by
    /// any per-target directives.
    pub fn directives(&self) -> String {
        let level = self.level.clone().unwrap_or_else(|| "info".to_string());
        match self.filters.as_deref() {
            Some(filters) if !filters.is_empty() => format!("{level},{filters}"),
            _ => level,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string("config.toml").unwrap_or_else(|_| "".to_string());
        if config_str.is_empty() {
            return Err("config.toml not found or empty".into());
        }
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }
}
