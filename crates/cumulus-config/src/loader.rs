//! Layered loading: preset, then file, then environment.

use std::path::Path;
use std::{env, fs, io};

use serde_json::Value;

use crate::{ConfigError, CumulusConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "CUMULUS";

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<CumulusConfig, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        })
    }
}

/// Builds a [`CumulusConfig`] from a preset, an optional file and
/// `PREFIX__SECTION__KEY` environment variables, each layer replacing the
/// previous one.
///
/// ```no_run
/// use cumulus_config::ConfigLoader;
///
/// # fn main() -> Result<(), cumulus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_production()
///     .with_file("cumulus.toml")?
///     .with_env_prefix("CUMULUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: CumulusConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from [`CumulusConfig::development`].
    ///
    /// ```
    /// use cumulus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = CumulusConfig::development();
        self
    }

    /// Starts from [`CumulusConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = CumulusConfig::production();
        self
    }

    /// Replaces the configuration with a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a missing or unreadable file, an unknown
    /// extension, or content that does not match the schema.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::named)
            .ok_or_else(|| {
                ConfigError::validation_error(format!(
                    "unsupported configuration file format: {}",
                    path.display()
                ))
            })?;

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::file_not_found(path),
            _ => ConfigError::read_error(path, e),
        })?;

        self.config = format.parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with `content` in the named format.
    ///
    /// ```
    /// use cumulus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[api]\napplication_url = \"https://heat.example.com:8004/v1/\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(config.api.application_url, "https://heat.example.com:8004/v1/");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown format or invalid content.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let format = Format::named(format).ok_or_else(|| {
            ConfigError::validation_error(format!("unsupported configuration format: {format}"))
        })?;
        self.config = format.parse(content)?;
        Ok(self)
    }

    /// Reads overrides from `PREFIX__SECTION__KEY` variables on [`load`](Self::load).
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file from the current directory or its parents, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a file is found but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Ok(self)
    }

    /// Loads variables from a specific dotenv file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn with_dotenv_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Applies environment overrides and returns the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or the result
    /// fails [`CumulusConfig::validate`].
    pub fn load(mut self) -> Result<CumulusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let scope = format!("{prefix}__");
            let mut vars: Vec<(String, String)> =
                env::vars().filter(|(k, _)| k.starts_with(&scope)).collect();
            vars.sort();
            self.apply_overrides(&scope, vars)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    // Overrides are written into the serialized tree so that the schema's own
    // deserializer checks them; only keys the schema has are accepted.
    fn apply_overrides(
        &mut self,
        scope: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        let mut tree = serde_json::to_value(&self.config)?;

        for (var, raw) in vars {
            let key = var.strip_prefix(scope).unwrap_or(&var);
            let slot = match key.split_once("__") {
                Some((section, field)) => tree
                    .get_mut(section.to_ascii_lowercase())
                    .and_then(|s| s.get_mut(field.to_ascii_lowercase())),
                None => None,
            };
            let Some(slot) = slot else {
                tracing::warn!(var = %var, "ignoring unknown configuration variable");
                continue;
            };

            let value = if slot.is_boolean() {
                Value::Bool(
                    parse_bool(&raw)
                        .ok_or_else(|| ConfigError::env_parse_error(&var, "expected boolean"))?,
                )
            } else {
                Value::String(raw)
            };
            *slot = value;

            self.config = serde_json::from_value(tree.clone())
                .map_err(|e| ConfigError::env_parse_error(&var, e.to_string()))?;
        }

        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
