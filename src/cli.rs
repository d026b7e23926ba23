//! Command-line interface parsing for DigiFacts
//!
//! This module handles parsing of CLI arguments using clap and layering the
//! flags over the settings loaded from the config file.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{ConfigError, DisplayMode, Settings};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified display mode is not recognized
    #[error("Invalid display mode: '{0}'. Valid modes: box, text")]
    InvalidDisplay(String),

    /// The config file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// DigiFacts - serve random DigiByte facts
#[derive(Parser, Debug)]
#[command(name = "digifacts")]
#[command(about = "Serve random DigiByte DigiFacts as embeddable HTML")]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults to the XDG config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Language code to show facts in (falls back to "en" if unsupported)
    #[arg(long, global = true, value_name = "CODE")]
    pub lang: Option<String>,

    /// How facts are framed: box or text
    #[arg(long, global = true, value_name = "MODE")]
    pub display: Option<String>,

    /// Base URL of the DigiFacts API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once settings are resolved
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Print one rendered fact and exit
    Show,
    /// Print the supported language codes and exit
    Languages,
}

impl Cli {
    /// The requested command, defaulting to `serve`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { addr: None })
    }

    /// Config file path: `--config`, else the default location
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Settings::default_path)
    }
}

/// Parses a display mode argument
///
/// # Returns
/// * `Ok(DisplayMode)` if the string names a mode
/// * `Err(CliError::InvalidDisplay)` otherwise
pub fn parse_display_arg(s: &str) -> Result<DisplayMode, CliError> {
    DisplayMode::parse(s).ok_or_else(|| CliError::InvalidDisplay(s.to_string()))
}

/// Applies command-line overrides on top of `settings`
pub fn apply_overrides(cli: &Cli, mut settings: Settings) -> Result<Settings, CliError> {
    if let Some(lang) = &cli.lang {
        settings.language = lang.clone();
    }
    if let Some(display) = &cli.display {
        settings.display = parse_display_arg(display)?;
    }
    if let Some(base_url) = &cli.base_url {
        settings.api_base_url = base_url.clone();
    }
    if let Some(Command::Serve { addr: Some(addr) }) = &cli.command {
        settings.listen_addr = *addr;
    }
    Ok(settings)
}

/// Loads the config file named by `cli` and applies its overrides
pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let settings = match cli.config_path() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    apply_overrides(cli, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_arg() {
        assert_eq!(parse_display_arg("box").unwrap(), DisplayMode::Box);
        assert_eq!(parse_display_arg("text").unwrap(), DisplayMode::Text);
    }

    #[test]
    fn test_parse_display_arg_invalid() {
        let err = parse_display_arg("fancy").unwrap_err();
        assert!(err.to_string().contains("Invalid display mode"));
        assert!(err.to_string().contains("fancy"));
    }

    #[test]
    fn test_cli_parse_no_args_defaults_to_serve() {
        let cli = Cli::parse_from(["digifacts"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.command(), Command::Serve { addr: None });
    }

    #[test]
    fn test_cli_parse_show_with_global_flags() {
        let cli = Cli::parse_from(["digifacts", "show", "--lang", "de", "--display", "text"]);
        assert_eq!(cli.command(), Command::Show);
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert_eq!(cli.display.as_deref(), Some("text"));
    }

    #[test]
    fn test_overrides_replace_file_settings() {
        let cli = Cli::parse_from([
            "digifacts",
            "--lang",
            "es",
            "--display",
            "text",
            "--base-url",
            "http://localhost:1234/",
            "serve",
            "--addr",
            "0.0.0.0:9090",
        ]);

        let settings = apply_overrides(&cli, Settings::default()).unwrap();

        assert_eq!(settings.language, "es");
        assert_eq!(settings.display, DisplayMode::Text);
        assert_eq!(settings.api_base_url, "http://localhost:1234/");
        assert_eq!(settings.listen_addr.port(), 9090);
    }

    #[test]
    fn test_no_overrides_keeps_settings() {
        let cli = Cli::parse_from(["digifacts", "languages"]);
        let base = Settings {
            language: "de".to_string(),
            ..Settings::default()
        };
        let settings = apply_overrides(&cli, base.clone()).unwrap();
        assert_eq!(settings, base);
    }

    #[test]
    fn test_invalid_display_override_fails() {
        let cli = Cli::parse_from(["digifacts", "--display", "fancy"]);
        assert!(matches!(
            apply_overrides(&cli, Settings::default()),
            Err(CliError::InvalidDisplay(_))
        ));
    }

    #[test]
    fn test_load_settings_from_explicit_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("digifacts.toml");
        std::fs::write(&path, "language = \"de\"\n").unwrap();

        let cli = Cli::parse_from(["digifacts", "--config", path.to_str().unwrap(), "show"]);
        let settings = load_settings(&cli).unwrap();

        assert_eq!(settings.language, "de");
    }

    #[test]
    fn test_load_settings_malformed_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("digifacts.toml");
        std::fs::write(&path, "language = [").unwrap();

        let cli = Cli::parse_from(["digifacts", "--config", path.to_str().unwrap()]);
        assert!(matches!(load_settings(&cli), Err(CliError::Config(_))));
    }
}
