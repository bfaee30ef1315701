use config::{Config, ConfigError, File};
use serde::Deserialize;
use snapfeed_api::{ClientConfig, Environment};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Selects between the development and production backends.
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_token_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("snapfeed")
        .join("tokens.json")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            token_path: default_token_path(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("SNAPFEED_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load(&config_path)
    }

    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SNAPFEED").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.token_path.as_os_str().is_empty() {
            return Err("token_path must not be empty".to_string());
        }
        if self.token_path.is_dir() {
            return Err(format!(
                "token_path {} is a directory",
                self.token_path.display()
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::for_environment(self.environment)
    }
}
