//! Core configuration.
//!
//! # Responsibility
//! - Hold timestamp preferences, logging settings and the keyword delimiter.
//! - Load them from JSON with every field defaulted.
//!
//! # Invariants
//! - A loaded `CoreConfig` has a valid strftime pattern and a non-whitespace
//!   keyword delimiter.

use crate::logging::default_log_level;
use crate::model::field::{Field, StandardField};
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter, Write};

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_KEYWORD_DELIMITER: char = ',';

/// Settings for automatic timestamp fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampPreferences {
    pub use_timestamps: bool,
    pub use_modified_timestamp: bool,
    pub timestamp_field: Field,
    /// strftime pattern, e.g. `%Y-%m-%d`.
    pub timestamp_format: String,
    pub overwrite_timestamp: bool,
}

impl Default for TimestampPreferences {
    fn default() -> Self {
        Self {
            use_timestamps: false,
            use_modified_timestamp: false,
            timestamp_field: Field::Standard(StandardField::Timestamp),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            overwrite_timestamp: false,
        }
    }
}

impl TimestampPreferences {
    pub fn include_created_timestamp(&self) -> bool {
        self.use_timestamps
    }

    pub fn include_modified_timestamp(&self) -> bool {
        self.use_modified_timestamp
    }

    pub fn overwrite_timestamp(&self) -> bool {
        self.overwrite_timestamp
    }

    pub fn timestamp_field(&self) -> Field {
        self.timestamp_field.clone()
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Current local time rendered with `timestamp_format`.
    ///
    /// Falls back to `%Y-%m-%d` if the pattern cannot be rendered.
    pub fn now(&self) -> String {
        let now = Local::now();
        let mut rendered = String::new();
        if write!(rendered, "{}", now.format(&self.timestamp_format)).is_err() {
            warn!("event=timestamp_format module=config status=fallback reason=invalid_pattern");
            return now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
        }
        rendered
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let has_error = StrftimeItems::new(&self.timestamp_format)
            .any(|item| matches!(item, Item::Error));
        if has_error {
            return Err(ConfigError::InvalidTimestampFormat(
                self.timestamp_format.clone(),
            ));
        }
        Ok(())
    }
}

/// Logging bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

/// Top-level configuration for embedding applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: Option<LoggingConfig>,
    pub timestamps: TimestampPreferences,
    pub keyword_delimiter: char,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: None,
            timestamps: TimestampPreferences::default(),
            keyword_delimiter: DEFAULT_KEYWORD_DELIMITER,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// - Returns `ConfigError::Parse` for malformed JSON or wrong types.
    /// - Returns a validation error for a whitespace keyword delimiter or an
    ///   invalid timestamp pattern.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword_delimiter.is_whitespace() {
            return Err(ConfigError::InvalidKeywordDelimiter(
                self.keyword_delimiter,
            ));
        }
        self.timestamps.validate()
    }
}

/// Configuration load errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidKeywordDelimiter(char),
    InvalidTimestampFormat(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::InvalidKeywordDelimiter(value) => {
                write!(f, "keyword delimiter must not be whitespace: {value:?}")
            }
            Self::InvalidTimestampFormat(value) => {
                write!(f, "timestamp format is invalid: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
