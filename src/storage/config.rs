//! Configuration file loading and resolution.
//!
//! Loads configuration from:
//! - Linux: `~/.config/commdash/config.toml`
//! - macOS: `~/Library/Application Support/com.commdash.commdash/config.toml`
//! - Windows: `%APPDATA%/commdash/commdash/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `COMMDASH_CONFIG`: Override config file path
//! - `COMMDASH_FORMAT`: Output format (human, json, md)
//! - `COMMDASH_TIMEOUT`: Request timeout in seconds
//! - `COMMDASH_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `COMMDASH_VERBOSE`: Enable verbose output
//! - `COMMDASH_PRETTY`: Pretty-print JSON output
//! - `COMMDASH_VOICE_URL` / `COMMDASH_SMS_URL`: Gateway base URLs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat};
use crate::core::gateway::{DEFAULT_SMS_BASE_URL, DEFAULT_VOICE_BASE_URL};
use crate::core::http::MAX_TIMEOUT;
use crate::error::{CommdashError, Result};
use crate::util::env::{env_string, is_env_truthy};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "COMMDASH_CONFIG";
/// Environment variable for output format.
pub const ENV_FORMAT: &str = "COMMDASH_FORMAT";
/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "COMMDASH_TIMEOUT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "COMMDASH_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for verbose output.
pub const ENV_VERBOSE: &str = "COMMDASH_VERBOSE";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "COMMDASH_PRETTY";
/// Environment variable for the voice gateway base URL.
pub const ENV_VOICE_URL: &str = "COMMDASH_VOICE_URL";
/// Environment variable for the SMS gateway base URL.
pub const ENV_SMS_URL: &str = "COMMDASH_SMS_URL";

/// Window length used by `stats` when none is given.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Output format.
    #[serde(serialize_with = "serialize_format")]
    pub format: OutputFormat,
    /// Request timeout; `None` means no client-side deadline.
    #[serde(serialize_with = "serialize_timeout")]
    pub timeout: Option<Duration>,
    /// Whether to disable colored output.
    pub no_color: bool,
    /// Whether verbose logging is enabled.
    pub verbose: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
    pub voice_base_url: String,
    pub sms_base_url: String,
    /// Default `stats` window length.
    pub default_window_days: u32,
    /// Config file consulted (it may not exist).
    pub config_path: PathBuf,
    /// Source of each setting.
    pub sources: ConfigSources,
}

impl Default for ResolvedConfig {
    /// Built-in defaults, ignoring the environment and config file.
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            timeout: None,
            no_color: false,
            verbose: false,
            pretty: false,
            voice_base_url: DEFAULT_VOICE_BASE_URL.to_string(),
            sms_base_url: DEFAULT_SMS_BASE_URL.to_string(),
            default_window_days: DEFAULT_WINDOW_DAYS,
            config_path: Config::default_path(),
            sources: ConfigSources::default(),
        }
    }
}

fn serialize_format<S: serde::Serializer>(
    format: &OutputFormat,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(format.as_str())
}

fn serialize_timeout<S: serde::Serializer>(
    timeout: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match timeout {
        Some(t) => serializer.serialize_some(&t.as_secs()),
        None => serializer.serialize_none(),
    }
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSources {
    pub format: ConfigSource,
    pub timeout: ConfigSource,
    pub no_color: ConfigSource,
    pub verbose: ConfigSource,
    pub pretty: ConfigSource,
    pub voice_base_url: ConfigSource,
    pub sms_base_url: ConfigSource,
    pub default_window_days: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the config file exists but is invalid, or any
    /// resolved value is out of range.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config_path = Self::config_path();
        let config = Config::load_from(&config_path)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let format = Self::resolve_format(cli, &config, &mut sources.format)?;
        let timeout = Self::resolve_timeout(cli, &config, &mut sources.timeout)?;
        let no_color = Self::resolve_no_color(cli, &config, &mut sources.no_color);
        let verbose = Self::resolve_verbose(cli, &mut sources.verbose);
        let pretty = Self::resolve_pretty(cli, &config, &mut sources.pretty);
        let voice_base_url = Self::resolve_url(
            cli.voice_url.as_deref(),
            ENV_VOICE_URL,
            config.gateway.voice_base_url.as_deref(),
            DEFAULT_VOICE_BASE_URL,
            &mut sources.voice_base_url,
        )?;
        let sms_base_url = Self::resolve_url(
            cli.sms_url.as_deref(),
            ENV_SMS_URL,
            config.gateway.sms_base_url.as_deref(),
            DEFAULT_SMS_BASE_URL,
            &mut sources.sms_base_url,
        )?;

        sources.default_window_days = if config.general.default_window_days == DEFAULT_WINDOW_DAYS
        {
            ConfigSource::Default
        } else {
            ConfigSource::ConfigFile
        };

        Ok(Self {
            format,
            timeout,
            no_color,
            verbose,
            pretty,
            voice_base_url,
            sms_base_url,
            default_window_days: config.general.default_window_days,
            config_path,
            sources,
        })
    }

    /// Config file path, respecting `COMMDASH_CONFIG`.
    #[must_use]
    pub fn config_path() -> PathBuf {
        env_string(ENV_CONFIG).map_or_else(Config::default_path, PathBuf::from)
    }

    fn resolve_format(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        // --json and a non-default --format are explicit.
        if cli.json || cli.format != OutputFormat::Human {
            *source = ConfigSource::Cli;
            return Ok(cli.effective_format());
        }

        if let Some(format_env) = env_string(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return parse_format(&format_env);
        }

        if let Some(ref format_str) = config.output.format {
            *source = ConfigSource::ConfigFile;
            return parse_format(format_str);
        }

        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    fn resolve_timeout(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<Option<Duration>> {
        if let Some(seconds) = cli.timeout {
            *source = ConfigSource::Cli;
            return check_timeout(seconds).map(Some);
        }

        if let Some(raw) = env_string(ENV_TIMEOUT) {
            *source = ConfigSource::Env;
            let seconds = raw.parse::<u64>().map_err(|_| {
                CommdashError::Config(format!("{ENV_TIMEOUT} must be a number of seconds, got '{raw}'"))
            })?;
            return check_timeout(seconds).map(Some);
        }

        if let Some(seconds) = config.general.timeout_seconds {
            *source = ConfigSource::ConfigFile;
            return check_timeout(seconds).map(Some);
        }

        *source = ConfigSource::Default;
        Ok(None)
    }

    fn resolve_no_color(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_NO_COLOR) || std::env::var(ENV_NO_COLOR_STD).is_ok() {
            *source = ConfigSource::Env;
            return true;
        }

        if !config.output.color {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    fn resolve_verbose(cli: &Cli, source: &mut ConfigSource) -> bool {
        if cli.verbose {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_VERBOSE) {
            *source = ConfigSource::Env;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    fn resolve_pretty(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        if cli.pretty {
            *source = ConfigSource::Cli;
            return true;
        }

        if is_env_truthy(ENV_PRETTY) {
            *source = ConfigSource::Env;
            return true;
        }

        if config.output.pretty {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        *source = ConfigSource::Default;
        false
    }

    fn resolve_url(
        flag: Option<&str>,
        env_var: &str,
        file: Option<&str>,
        default: &str,
        source: &mut ConfigSource,
    ) -> Result<String> {
        let (value, from) = if let Some(url) = flag {
            (url.to_string(), ConfigSource::Cli)
        } else if let Some(url) = env_string(env_var) {
            (url, ConfigSource::Env)
        } else if let Some(url) = file {
            (url.to_string(), ConfigSource::ConfigFile)
        } else {
            (default.to_string(), ConfigSource::Default)
        };
        check_url(&value)?;
        *source = from;
        Ok(value)
    }
}

/// Parse a format string into `OutputFormat`.
fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.trim().to_lowercase().as_str() {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        "md" | "markdown" => Ok(OutputFormat::Md),
        _ => Err(CommdashError::Config(format!(
            "Invalid format '{s}'. Valid formats: human, json, md"
        ))),
    }
}

fn check_timeout(seconds: u64) -> Result<Duration> {
    if seconds == 0 || seconds > MAX_TIMEOUT.as_secs() {
        return Err(CommdashError::Config(format!(
            "Timeout must be between 1 and {} seconds, got {seconds}",
            MAX_TIMEOUT.as_secs()
        )));
    }
    Ok(Duration::from_secs(seconds))
}

fn check_url(value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| CommdashError::Config(format!("Invalid gateway URL '{value}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CommdashError::Config(format!(
            "Gateway URL '{value}' must use http or https"
        )));
    }
    Ok(())
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Gateway endpoints.
    pub gateway: GatewayConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Request timeout in seconds. Unset means no timeout.
    pub timeout_seconds: Option<u64>,
    /// Window length for `stats` without `--days`.
    pub default_window_days: u32,
}

/// Gateway endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub voice_base_url: Option<String>,
    pub sms_base_url: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    /// Whether to use colors in output.
    pub color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Default config file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CommdashError::Config(format!("Invalid config file: {e}")))
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CommdashError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        tracing::debug!(?path, "Config file saved");
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.output.format {
            parse_format(format)?;
        }

        if let Some(seconds) = self.general.timeout_seconds {
            check_timeout(seconds)?;
        }

        if self.general.default_window_days == 0 {
            return Err(CommdashError::Config(
                "default_window_days must be at least 1".to_string(),
            ));
        }

        for url in [&self.gateway.voice_base_url, &self.gateway.sms_base_url]
            .into_iter()
            .flatten()
        {
            check_url(url)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::EnvGuard;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ALL_ENV: &[&str] = &[
        ENV_CONFIG,
        ENV_FORMAT,
        ENV_TIMEOUT,
        ENV_NO_COLOR,
        ENV_NO_COLOR_STD,
        ENV_VERBOSE,
        ENV_PRETTY,
        ENV_VOICE_URL,
        ENV_SMS_URL,
    ];

    /// Isolate from the developer's environment and config file.
    fn clean_env() -> EnvGuard {
        let mut guard = EnvGuard::new();
        for key in ALL_ENV {
            guard.remove(key);
        }
        guard.set(ENV_CONFIG, "/nonexistent/commdash/config.toml");
        guard
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["commdash"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn sample_config_file_loads() {
        let dir = crate::test_utils::TestDir::new();
        dir.create_file("config.toml", &crate::test_utils::make_test_config_toml());
        let config = Config::load_from(&dir.file_path("config.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.general.timeout_seconds, Some(30));
        assert_eq!(config.general.default_window_days, 14);
        assert_eq!(config.gateway.sms_base_url.as_deref(), Some("http://127.0.0.1:9"));
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.general.timeout_seconds.is_none());
        assert_eq!(config.general.default_window_days, 7);
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.general.default_window_days, 7);
    }

    #[test]
    fn load_valid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[general]
timeout_seconds = 60
default_window_days = 14

[gateway]
voice_base_url = "http://127.0.0.1:8080/VoiceApi"

[output]
color = false
pretty = true
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.general.timeout_seconds, Some(60));
        assert_eq!(config.general.default_window_days, 14);
        assert_eq!(
            config.gateway.voice_base_url.as_deref(),
            Some("http://127.0.0.1:8080/VoiceApi")
        );
        assert!(!config.output.color);
        assert!(config.output.pretty);
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.general.timeout_seconds = Some(120);
        config.gateway.sms_base_url = Some("https://sms.example.net".to_string());

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.general.timeout_seconds, Some(120));
        assert_eq!(loaded.gateway.sms_base_url.as_deref(), Some("https://sms.example.net"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.general.timeout_seconds = Some(0);
        assert!(config.validate().unwrap_err().to_string().contains("Timeout must be between"));

        let mut config = Config::default();
        config.general.timeout_seconds = Some(500);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.format = Some("yaml".to_string());
        assert!(config.validate().unwrap_err().to_string().contains("Invalid format"));

        let mut config = Config::default();
        config.gateway.voice_base_url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.default_window_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_source_display() {
        assert_eq!(format!("{}", ConfigSource::Cli), "CLI flag");
        assert_eq!(format!("{}", ConfigSource::Env), "environment variable");
        assert_eq!(format!("{}", ConfigSource::ConfigFile), "config file");
        assert_eq!(format!("{}", ConfigSource::Default), "default");
    }

    #[test]
    fn resolved_config_defaults() {
        let _env = clean_env();
        let resolved = ResolvedConfig::resolve(&cli(&["stats"])).unwrap();

        assert_eq!(resolved.format, OutputFormat::Human);
        assert!(resolved.timeout.is_none());
        assert_eq!(resolved.voice_base_url, DEFAULT_VOICE_BASE_URL);
        assert_eq!(resolved.sms_base_url, DEFAULT_SMS_BASE_URL);
        assert_eq!(resolved.sources.timeout, ConfigSource::Default);
        assert_eq!(resolved.default_window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let mut env = clean_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[general]\ntimeout_seconds = 30\n[gateway]\nvoice_base_url = \"http://file.example\"\n",
        )
        .unwrap();
        env.set(ENV_CONFIG, path.to_str().unwrap());

        let resolved = ResolvedConfig::resolve(&cli(&["stats"])).unwrap();
        assert_eq!(resolved.timeout, Some(Duration::from_secs(30)));
        assert_eq!(resolved.sources.timeout, ConfigSource::ConfigFile);
        assert_eq!(resolved.voice_base_url, "http://file.example");

        env.set(ENV_TIMEOUT, "45");
        env.set(ENV_VOICE_URL, "http://env.example");
        let resolved = ResolvedConfig::resolve(&cli(&["stats"])).unwrap();
        assert_eq!(resolved.timeout, Some(Duration::from_secs(45)));
        assert_eq!(resolved.sources.voice_base_url, ConfigSource::Env);

        let resolved = ResolvedConfig::resolve(&cli(&[
            "--timeout",
            "5",
            "--voice-url",
            "http://flag.example",
            "stats",
        ]))
        .unwrap();
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
        assert_eq!(resolved.voice_base_url, "http://flag.example");
        assert_eq!(resolved.sources.voice_base_url, ConfigSource::Cli);
    }

    #[test]
    fn env_format_and_flags() {
        let mut env = clean_env();
        env.set(ENV_FORMAT, "md");
        env.set(ENV_PRETTY, "yes");

        let resolved = ResolvedConfig::resolve(&cli(&["stats"])).unwrap();
        assert_eq!(resolved.format, OutputFormat::Md);
        assert_eq!(resolved.sources.format, ConfigSource::Env);
        assert!(resolved.pretty);

        let resolved = ResolvedConfig::resolve(&cli(&["--json", "stats"])).unwrap();
        assert_eq!(resolved.format, OutputFormat::Json);
        assert_eq!(resolved.sources.format, ConfigSource::Cli);
    }

    #[test]
    fn invalid_timeout_flag_is_config_error() {
        let mut env = clean_env();
        let err = ResolvedConfig::resolve(&cli(&["--timeout", "0", "stats"])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::ExitCode::ParseError);

        env.set(ENV_TIMEOUT, "soon");
        assert!(ResolvedConfig::resolve(&cli(&["stats"])).is_err());
    }
}
