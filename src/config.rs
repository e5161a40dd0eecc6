//! Translator configuration.
//!
//! Applications can load [`JoinConfig`] from the `[joins]` section of
//! `config/config.toml` or from `RELATION_JOINS__JOINS__*` environment
//! variables with `JoinConfig::load()`.

use crate::relation::{JoinKind, LiteralMode};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "RELATION_JOINS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JoinConfig {
    /// Join kind used when the caller does not name one
    #[serde(default)]
    pub default_join_kind: JoinKind,
    /// Whether generated literals are inlined or bound
    #[serde(default)]
    pub literal_mode: LiteralMode,
}

impl JoinConfig {
    /// Load the join configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // File exists but is unreadable: retry with env only
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("Failed to load {}, falling back to env. Error: {}", CONFIG_FILE, err);
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document with a `[joins]` table
    ///
    /// ```
    /// use relation_joins::{JoinConfig, JoinKind, LiteralMode};
    ///
    /// let config = JoinConfig::from_toml_str("[joins]\ndefault_join_kind = \"outer\"\n").unwrap();
    /// assert_eq!(config.default_join_kind, JoinKind::Outer);
    /// assert_eq!(config.literal_mode, LiteralMode::Inline);
    /// ```
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<JoinConfig>("joins") {
            Ok(config) => Ok(config),
            // The section is optional; every field has a default.
            Err(ConfigError::NotFound(_)) => Ok(JoinConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Join configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}
