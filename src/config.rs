//! Runtime settings for DigiFacts
//!
//! Settings are read once from a TOML file (or defaults) and then passed by
//! value into each component. Nothing in the pipeline reads global state.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{DEFAULT_API_BASE_URL, DEFAULT_LANGUAGE};

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Settings`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a rendered fact is framed on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Bordered box around the fact
    #[default]
    Box,
    /// Plain text, no border
    #[serde(alias = "plain")]
    Text,
}

impl DisplayMode {
    /// Parses a display mode name, case-insensitively
    ///
    /// `plain` is accepted as another name for `text`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "box" => Some(DisplayMode::Box),
            "text" | "plain" => Some(DisplayMode::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Box => "box",
            DisplayMode::Text => "text",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the background language-list refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Whether the scheduler runs at all
    pub enabled: bool,
    /// Seconds between language-list refreshes
    pub interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 3600,
        }
    }
}

/// Everything the pipeline needs to know about its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Active language code
    pub language: String,
    /// Box or plain-text framing
    pub display: DisplayMode,
    /// Base URL of the DigiFacts API
    pub api_base_url: String,
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Lifetime of a cached fact set
    pub fact_ttl_secs: u64,
    /// Lifetime of the cached supported-language list
    pub languages_ttl_secs: u64,
    /// Lifetime of an issued refresh token
    pub token_ttl_secs: u64,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub refresh: RefreshSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            display: DisplayMode::Box,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            fact_ttl_secs: 300,
            languages_ttl_secs: 3600,
            token_ttl_secs: 86_400,
            log_level: "info".to_string(),
            refresh: RefreshSettings::default(),
        }
    }
}

impl Settings {
    /// Default config file location (`~/.config/digifacts/config.toml` on Linux)
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "digifacts")?;
        Some(project_dirs.config_dir().join("config.toml"))
    }

    /// Parses settings from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn fact_ttl(&self) -> Duration {
        Duration::from_secs(self.fact_ttl_secs)
    }

    pub fn languages_ttl(&self) -> Duration {
        Duration::from_secs(self.languages_ttl_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.display, DisplayMode::Box);
        assert_eq!(settings.fact_ttl(), Duration::from_secs(300));
        assert!(!settings.refresh.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = Settings::from_toml(
            r#"
            language = "de"
            display = "text"

            [refresh]
            enabled = true
            "#,
        )
        .expect("Should parse partial config");

        assert_eq!(settings.language, "de");
        assert_eq!(settings.display, DisplayMode::Text);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert!(settings.refresh.enabled);
        assert_eq!(settings.refresh.interval_secs, 3600);
    }

    #[test]
    fn test_invalid_display_is_parse_error() {
        let result = Settings::from_toml(r#"display = "fancy""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings = Settings::load(&temp_dir.path().join("absent.toml"))
            .expect("Missing file should not be an error");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_reads_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "listen_addr = \"0.0.0.0:9000\"\nfact_ttl_secs = 60\n")
            .expect("Should write config");

        let settings = Settings::load(&path).expect("Should load config");
        assert_eq!(settings.listen_addr.port(), 9000);
        assert_eq!(settings.fact_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Settings::load(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_display_mode_parsing() {
        assert_eq!(DisplayMode::parse("box"), Some(DisplayMode::Box));
        assert_eq!(DisplayMode::parse(" TEXT "), Some(DisplayMode::Text));
        assert_eq!(DisplayMode::parse("plain"), Some(DisplayMode::Text));
        assert_eq!(DisplayMode::parse("fancy"), None);
        for mode in [DisplayMode::Box, DisplayMode::Text] {
            assert_eq!(DisplayMode::parse(&mode.to_string()), Some(mode));
        }
        let settings = Settings::from_toml(r#"display = "plain""#).unwrap();
        assert_eq!(settings.display, DisplayMode::Text);
    }

    #[test]
    fn test_default_path_mentions_project() {
        if let Some(path) = Settings::default_path() {
            assert!(path.to_string_lossy().contains("digifacts"));
        }
        // Test passes if default_path() returns None (e.g., no home directory in CI)
    }
}
