//! Store configuration.
//!
//! [`StoreConfig`] is loaded from `config/config.toml` (optional) with
//! `SHOPKEEPER__*` environment variables layered on top, e.g.
//! `SHOPKEEPER__STORE__PATH=shop.db`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Database file path, or `:memory:` for a private in-memory store.
    #[serde(default = "default_path")]
    pub path: String,
    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Journal mode applied to file-backed stores.
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: default_journal_mode(),
        }
    }
}

fn default_path() -> String {
    ":memory:".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_journal_mode() -> String {
    "WAL".to_string()
}

impl StoreConfig {
    /// Load the store configuration from `config/config.toml`, falling back
    /// to environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when neither source yields a usable
    /// `store` section.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("SHOPKEEPER").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file existed but was unreadable; retry with env only.
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!("failed to load config file, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("SHOPKEEPER").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "failed to load configuration from file ({err}) and env ({env_err})"
                        ))
                    })?
            }
        };

        match settings.get::<StoreConfig>("store") {
            Ok(store) => Ok(store),
            // No `store` section anywhere: every field has a default.
            Err(ConfigError::NotFound(_)) => Ok(StoreConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "store configuration could not be loaded: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_memory() {
        let config = StoreConfig::default();
        assert_eq!(config.path, ":memory:");
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert_eq!(config.journal_mode, "WAL");
    }
}
