//! Configuration types and loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use crate::catalog::Localization;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", .line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    Parse { line: Option<usize>, message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Where in an HTTP request a locale candidate may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    Header,
    Cookie,
    Query,
}

/// One step of the HTTP lookup strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpLocalePosition {
    /// Request part to read.
    pub source: LocaleSource,
    /// Header name, cookie name or query parameter name.
    pub key: String,
}

impl HttpLocalePosition {
    /// Look in a request header.
    pub fn header(key: impl Into<String>) -> Self {
        Self {
            source: LocaleSource::Header,
            key: key.into(),
        }
    }

    /// Look in a cookie.
    pub fn cookie(key: impl Into<String>) -> Self {
        Self {
            source: LocaleSource::Cookie,
            key: key.into(),
        }
    }

    /// Look in a query parameter.
    pub fn query(key: impl Into<String>) -> Self {
        Self {
            source: LocaleSource::Query,
            key: key.into(),
        }
    }
}

/// `Accept-Language` header, then `lang` cookie, then `lang` query parameter.
pub fn default_lookup_strategy() -> Vec<HttpLocalePosition> {
    vec![
        HttpLocalePosition::header("Accept-Language"),
        HttpLocalePosition::cookie("lang"),
        HttpLocalePosition::query("lang"),
    ]
}

/// i18n configuration.
///
/// `locales` is ordered from most to least preferred; the first is the
/// default. Localizations come from `path` (one file per locale) or, when
/// no path is set, from the inline `localizations` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locale identifiers, default first.
    pub locales: Vec<String>,
    /// Directory holding one localization file per locale.
    pub path: Option<PathBuf>,
    /// Inline `locale -> key -> entry` localizations.
    pub localizations: Option<HashMap<String, HashMap<String, Localization>>>,
    /// Reject an empty `locales` list instead of falling back to English.
    pub strict_locales: bool,
    /// Where to look for a locale in HTTP requests.
    pub http_lookup_strategy: Vec<HttpLocalePosition>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            path: None,
            localizations: None,
            strict_locales: false,
            http_lookup_strategy: default_lookup_strategy(),
        }
    }
}

impl I18nConfig {
    /// Config loading localization files from `path`.
    pub fn with_path<S: Into<String>>(
        locales: impl IntoIterator<Item = S>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Config using in-memory localizations.
    pub fn with_localizations<S: Into<String>>(
        locales: impl IntoIterator<Item = S>,
        localizations: HashMap<String, HashMap<String, Localization>>,
    ) -> Self {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            localizations: Some(localizations),
            ..Self::default()
        }
    }

    /// Check values that setup cannot catch on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for position in &self.http_lookup_strategy {
            if position.key.trim().is_empty() {
                return Err(ConfigError::Validation {
                    message: format!(
                        "http_lookup_strategy {:?} entry has an empty key",
                        position.source
                    ),
                });
            }
        }

        if self.locales.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation {
                message: "locales must not contain empty identifiers".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads [`I18nConfig`] from YAML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a YAML config file.
    ///
    /// A relative `path` inside the file is resolved against the file's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<I18nConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;

        if let (Some(localizations_path), Some(base)) = (&config.path, path.parent()) {
            if localizations_path.is_relative() {
                config.path = Some(base.join(localizations_path));
            }
        }

        Ok(config)
    }

    /// Parse and validate YAML config text.
    ///
    /// `${VAR}` and `${VAR:-default}` are expanded in every string value
    /// except those under `localizations`, whose templates are kept as
    /// written.
    pub fn parse(contents: &str) -> Result<I18nConfig, ConfigError> {
        let mut value: Value = serde_yaml::from_str(contents).map_err(parse_error)?;
        if value.is_null() {
            value = Value::Mapping(Default::default());
        }

        let re = env_var_pattern()?;
        if let Value::Mapping(map) = &mut value {
            for (key, entry) in map.iter_mut() {
                if key.as_str() != Some("localizations") {
                    expand_value(&re, entry)?;
                }
            }
        }

        let config: I18nConfig = serde_yaml::from_value(value).map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a config back out as YAML.
    pub fn save(path: impl AsRef<Path>, config: &I18nConfig) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::Parse {
            line: None,
            message: e.to_string(),
        })?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

fn parse_error(e: serde_yaml::Error) -> ConfigError {
    ConfigError::Parse {
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    }
}

fn env_var_pattern() -> Result<Regex, ConfigError> {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| ConfigError::Parse {
        line: None,
        message: e.to_string(),
    })
}

/// Expand placeholders in every string below `value`.
///
/// A string that is a single placeholder expanding to `true` or `false`
/// becomes a boolean, so flags can come from the environment.
fn expand_value(re: &Regex, value: &mut Value) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => {
            let whole = re.find(s).is_some_and(|m| m.as_str().len() == s.len());
            let expanded = expand_env_vars(re, s)?;
            *value = match (whole, expanded.as_str()) {
                (true, "true") => Value::Bool(true),
                (true, "false") => Value::Bool(false),
                _ => Value::String(expanded),
            };
        }
        Value::Sequence(items) => {
            for item in items {
                expand_value(re, item)?;
            }
        }
        Value::Mapping(map) => {
            for (_, entry) in map.iter_mut() {
                expand_value(re, entry)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(re: &Regex, content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}
