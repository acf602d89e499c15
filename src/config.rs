//! # Configuration Management
//!
//! Centralized configuration for token issuing.
//!
//! This module holds the app credentials, token lifetime defaults, the
//! build mode, and logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variables via `from_env()`
//!
//! ## Security Considerations
//! - The app certificate is never serialized (`example_config()`, `save_to_file()`)
//! - `Debug` output redacts the app certificate

use crate::core::identity::{is_credential_format, Credentials};
use crate::error::{Result, TokenError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Version prefix of the current token format
pub const TOKEN_VERSION: &str = "007";

/// Version prefix of the legacy token format
pub const LEGACY_TOKEN_VERSION: &str = "006";

/// Length of the version prefix on every token
pub const VERSION_LENGTH: usize = 3;

/// Default token lifetime in seconds
pub const DEFAULT_EXPIRE_SECONDS: u32 = 900;

/// Default privilege lifetime in seconds
pub const DEFAULT_PRIVILEGE_EXPIRE_SECONDS: u32 = 3600;

/// Max inflated size of a token body (1 MiB)
pub const MAX_INFLATED_SIZE: usize = 1024 * 1024;

/// Whether a v007 build fails or yields "" when credentials are not 32-hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Fail with `TokenError::InvalidCredentialFormat`
    #[default]
    Strict,
    /// Return an empty token instead
    Lenient,
}

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TokenConfig {
    /// App id and certificate
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Token defaults
    #[serde(default)]
    pub token: TokenDefaults,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TokenConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| TokenError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| TokenError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| TokenError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(app_id) = std::env::var("AGORA_APP_ID") {
            config.credentials.app_id = app_id;
        }

        if let Ok(cert) = std::env::var("AGORA_APP_CERTIFICATE") {
            config.credentials.app_certificate = cert;
        }

        if let Ok(expire) = std::env::var("AGORA_TOKEN_EXPIRE_SECONDS") {
            config.token.expire_seconds = expire.parse::<u32>().map_err(|e| {
                TokenError::ConfigError(format!("Invalid AGORA_TOKEN_EXPIRE_SECONDS: {e}"))
            })?;
        }

        if let Ok(strict) = std::env::var("AGORA_TOKEN_STRICT") {
            config.token.strict = strict.parse::<bool>().map_err(|e| {
                TokenError::ConfigError(format!("Invalid AGORA_TOKEN_STRICT: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file.
    ///
    /// The app certificate is never written. Supply it again before calling
    /// [`TokenConfig::credentials`] on a reloaded config, for example through
    /// `AGORA_APP_CERTIFICATE` and [`TokenConfig::from_env`].
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TokenError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| TokenError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Credentials for the token builders
    ///
    /// # Errors
    /// Returns `TokenError::EmptyRequiredField` if either value is unset
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            self.credentials.app_id.clone(),
            self.credentials.app_certificate.clone(),
        )
    }

    pub fn build_mode(&self) -> BuildMode {
        if self.token.strict {
            BuildMode::Strict
        } else {
            BuildMode::Lenient
        }
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.credentials.validate());
        errors.extend(self.token.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TokenError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// App credentials as issued by the console
#[derive(Clone, Deserialize, Serialize, Default)]
pub struct CredentialsConfig {
    /// 32 hex character app id
    #[serde(default)]
    pub app_id: String,

    /// 32 hex character app certificate
    #[serde(default, skip_serializing)]
    pub app_certificate: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .finish()
    }
}

impl CredentialsConfig {
    /// Validate credentials
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_id.is_empty() {
            errors.push("App id cannot be empty".to_string());
        } else if !is_credential_format(&self.app_id) {
            errors.push(format!(
                "Invalid app id: '{}' (expected 32 hexadecimal characters)",
                self.app_id
            ));
        }

        if self.app_certificate.is_empty() {
            errors.push("App certificate cannot be empty".to_string());
        } else if !is_credential_format(&self.app_certificate) {
            errors.push("Invalid app certificate (expected 32 hexadecimal characters)".to_string());
        }

        errors
    }
}

/// Defaults applied by the token builders
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenDefaults {
    /// Token lifetime in seconds, relative to the issue timestamp
    pub expire_seconds: u32,

    /// Privilege lifetime in seconds, relative to now
    pub privilege_expire_seconds: u32,

    /// Fail on malformed credentials instead of returning an empty token
    pub strict: bool,
}

impl Default for TokenDefaults {
    fn default() -> Self {
        Self {
            expire_seconds: DEFAULT_EXPIRE_SECONDS,
            privilege_expire_seconds: DEFAULT_PRIVILEGE_EXPIRE_SECONDS,
            strict: true,
        }
    }
}

impl TokenDefaults {
    /// Validate token defaults
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.expire_seconds == 0 {
            errors.push("Token expire_seconds must be greater than 0".to_string());
        } else if self.expire_seconds > 24 * 3600 {
            errors.push(format!(
                "Token expire_seconds too long: {} (maximum: 24 hours)",
                self.expire_seconds
            ));
        }

        if self.privilege_expire_seconds == 0 {
            errors.push("Privilege expire_seconds must be greater than 0".to_string());
        }

        if !self.strict {
            errors.push(
                "WARNING: Lenient mode hides malformed credentials - not recommended for production"
                    .to_string(),
            );
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("agora-token"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = level.as_str().to_lowercase();
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
