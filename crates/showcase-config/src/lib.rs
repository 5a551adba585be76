//! Shared configuration for the showcase terminal app.
//!
//! TOML file + `SHOWCASE_*` environment overrides, mail credential
//! resolution (env var, then plaintext), and translation to the
//! `showcase_mail` client settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use showcase_mail::EmailJsCredentials;

/// Prefix for environment overrides; nested keys are split on `__`.
pub const ENV_PREFIX: &str = "SHOWCASE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for contact delivery")]
    NoCredentials { what: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub carousel: CarouselSettings,

    #[serde(default)]
    pub theme: ThemeSettings,

    #[serde(default)]
    pub contact: ContactSettings,

    #[serde(default)]
    pub content: ContentSettings,
}

/// The week carousel on the journey screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CarouselSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_true")]
    pub autoplay: bool,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            autoplay: true,
        }
    }
}

impl CarouselSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Colour theme and the theme cycler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeSettings {
    /// Starting theme: light, dark, blue, green or orange.
    #[serde(default = "default_theme")]
    pub name: String,

    /// Cycle through themes automatically.
    #[serde(default)]
    pub autoplay: bool,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            name: default_theme(),
            autoplay: false,
            interval_ms: default_interval_ms(),
        }
    }
}

impl ThemeSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// EmailJS delivery for the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub service_id: Option<String>,

    pub template_id: Option<String>,

    /// Public key (plaintext; prefer `public_key_env`).
    pub public_key: Option<String>,

    /// Environment variable name containing the public key.
    #[serde(default = "default_public_key_env")]
    pub public_key_env: Option<String>,

    /// Environment variable name containing the private access token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: None,
            template_id: None,
            public_key: None,
            public_key_env: default_public_key_env(),
            access_token_env: default_access_token_env(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentSettings {
    /// Catalog file replacing the built-in course content.
    pub path: Option<PathBuf>,
}

fn default_interval_ms() -> u64 {
    5_000
}
fn default_true() -> bool {
    true
}
fn default_theme() -> String {
    "dark".into()
}
fn default_endpoint() -> String {
    showcase_mail::client::DEFAULT_ENDPOINT.into()
}
#[allow(clippy::unnecessary_wraps)]
fn default_public_key_env() -> Option<String> {
    Some("SHOWCASE_EMAILJS_PUBLIC_KEY".into())
}
#[allow(clippy::unnecessary_wraps)]
fn default_access_token_env() -> Option<String> {
    Some("SHOWCASE_EMAILJS_ACCESS_TOKEN".into())
}
fn default_timeout() -> u64 {
    15
}

// ── Validation ──────────────────────────────────────────────────────

impl Config {
    /// Reject values no consumer can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.interval_ms == 0 {
            return Err(invalid("carousel.interval_ms", "must be greater than zero"));
        }
        if self.theme.interval_ms == 0 {
            return Err(invalid("theme.interval_ms", "must be greater than zero"));
        }
        if self.contact.timeout_secs == 0 {
            return Err(invalid("contact.timeout_secs", "must be greater than zero"));
        }
        parse_endpoint(&self.contact.endpoint)?;
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw
        .parse()
        .map_err(|_| invalid("contact.endpoint", format!("invalid URL: {raw}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            "contact.endpoint",
            format!("expected http or https, got '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "showcase", "showcase").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for the TUI log file.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("dev", "showcase", "showcase")
        .map_or_else(dirs_fallback, |dirs| dirs.data_local_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("showcase");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the platform config file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the EmailJS public key: `public_key_env` → plaintext.
pub fn resolve_public_key(contact: &ContactSettings) -> Result<SecretString, ConfigError> {
    // 1. Env var named by the settings
    if let Some(val) = contact
        .public_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
    {
        return Ok(SecretString::from(val));
    }

    // 2. Plaintext in config
    if let Some(ref key) = contact.public_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        what: "EmailJS public key".into(),
    })
}

/// Optional private access token, read only from the environment.
pub fn resolve_access_token(contact: &ContactSettings) -> Option<SecretString> {
    contact
        .access_token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Everything needed to build an `EmailJsClient`.
#[derive(Debug)]
pub struct MailSetup {
    pub endpoint: Url,
    pub credentials: EmailJsCredentials,
    pub timeout: Duration,
}

/// Translate contact settings into client settings.
pub fn mail_setup(contact: &ContactSettings) -> Result<MailSetup, ConfigError> {
    let endpoint = parse_endpoint(&contact.endpoint)?;
    let service_id = contact
        .service_id
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            what: "EmailJS service_id".into(),
        })?;
    let template_id = contact
        .template_id
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            what: "EmailJS template_id".into(),
        })?;
    let public_key = resolve_public_key(contact)?;

    Ok(MailSetup {
        endpoint,
        credentials: EmailJsCredentials {
            service_id,
            template_id,
            public_key,
            access_token: resolve_access_token(contact),
        },
        timeout: Duration::from_secs(contact.timeout_secs),
    })
}
