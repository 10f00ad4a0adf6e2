// Configuration types module
// Defines all configuration-related data structures

use chrono_tz::Tz;
use serde::Deserialize;

use crate::i18n::timezone::parse_timezone;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Listen backlog for the application socket
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    128
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Locale and timezone negotiation settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    /// Locales the server can render, in tie-break order
    #[serde(default = "default_supported_locales")]
    pub supported_locales: Vec<String>,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

fn default_supported_locales() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_locale() -> String {
    "en".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_locales: default_supported_locales(),
            default_locale: default_locale(),
            default_timezone: default_timezone(),
        }
    }
}

impl I18nConfig {
    /// Exact, case-sensitive membership in the supported set
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported_locales.iter().any(|l| l == locale)
    }

    /// Parsed default timezone; `validate` guarantees it parses
    pub fn fallback_timezone(&self) -> Tz {
        parse_timezone(&self.default_timezone).unwrap_or(Tz::UTC)
    }

    /// Reject defaults the negotiators could never produce
    pub fn validate(&self) -> Result<(), String> {
        if self.supported_locales.is_empty() {
            return Err("i18n.supported_locales must not be empty".to_string());
        }
        if !self.is_supported(&self.default_locale) {
            return Err(format!(
                "i18n.default_locale '{}' is not one of {:?}",
                self.default_locale, self.supported_locales
            ));
        }
        if parse_timezone(&self.default_timezone).is_none() {
            return Err(format!(
                "i18n.default_timezone '{}' is not a valid timezone",
                self.default_timezone
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i18n_defaults() {
        let i18n = I18nConfig::default();
        assert_eq!(i18n.supported_locales, vec!["en", "fr"]);
        assert_eq!(i18n.default_locale, "en");
        assert_eq!(i18n.fallback_timezone(), Tz::UTC);
        assert!(i18n.validate().is_ok());
    }

    #[test]
    fn test_is_supported_is_exact() {
        let i18n = I18nConfig::default();
        assert!(i18n.is_supported("fr"));
        assert!(!i18n.is_supported("FR"));
        assert!(!i18n.is_supported("kg"));
        assert!(!i18n.is_supported(""));
    }

    #[test]
    fn test_validate_rejects_bad_defaults() {
        let i18n = I18nConfig {
            default_locale: "de".to_string(),
            ..I18nConfig::default()
        };
        assert!(i18n.validate().is_err());

        let i18n = I18nConfig {
            default_timezone: "Vulcan".to_string(),
            ..I18nConfig::default()
        };
        assert!(i18n.validate().is_err());

        let i18n = I18nConfig {
            supported_locales: Vec::new(),
            ..I18nConfig::default()
        };
        assert!(i18n.validate().is_err());
    }
}
