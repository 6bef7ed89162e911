//! Shared configuration for Society Ease tools.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), a
//! file-backed token store, and translation to `society_core::ClientConfig`.
//! The CLI layers its global flags on top.

mod tokens;

use std::collections::HashMap;
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

use society_core::{ClientConfig, TlsVerification};

pub use tokens::FileTokenStore;

const KEYRING_SERVICE: &str = "society";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is requested explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Alert badge refresh period in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://society.example/api").
    pub server: String,

    /// Login email.
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    pub poll_interval: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "society-ease", "society")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "society", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where a profile's session tokens are kept.
pub fn token_path(profile_name: &str) -> PathBuf {
    let file = format!("{profile_name}.json");
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "society", "tokens", &file]),
        |dirs| dirs.data_dir().join("tokens").join(&file),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, layered as defaults ← file ← `SOCIETY_*` env.
///
/// Nested keys use a double underscore, e.g. `SOCIETY_DEFAULTS__OUTPUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SOCIETY_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Write `cfg` to a sibling temp file, then rename it over `path`. A failed
/// write leaves the existing file untouched.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    let tmp = staging_path(path);
    std::fs::write(&tmp, toml_str)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a profile's login password.
///
/// Order: the profile's `password_env` variable, `SOCIETY_PASSWORD`, the
/// system keyring, then plaintext in the config file.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

/// [`resolve_password`] with injectable env and keyring lookups.
pub fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }
    if let Some(pw) = env("SOCIETY_PASSWORD") {
        return Ok(SecretString::from(pw));
    }
    if let Some(pw) = keyring(profile_name) {
        return Ok(SecretString::from(pw));
    }
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .ok()?
        .get_password()
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `ClientConfig` from a profile, falling back to `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let server: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        server,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval: Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            server: "https://society.example/api".into(),
            email: Some("admin@example.com".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.active_profile_name(), "default");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "tower-b"

[defaults]
output = "json"
poll_interval = 15

[profiles.tower-b]
server = "https://tower-b.example/api"
email = "admin@example.com"
timeout = 10
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(), "tower-b");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");

        let p = cfg.profile("tower-b").unwrap();
        assert_eq!(p.timeout, Some(10));
        assert!(matches!(
            cfg.profile("missing"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn saving_replaces_existing_config_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_profile = \"old\"\n").unwrap();

        let mut cfg = Config::default();
        cfg.profiles.insert("home".into(), profile());
        cfg.default_profile = Some("home".into());
        save_config_to(&cfg, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), cfg);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("config.toml")]);
    }

    #[test]
    fn client_config_uses_profile_overrides() {
        let mut p = profile();
        p.timeout = Some(5);
        let defaults = Defaults::default();

        let cc = profile_to_client_config(&p, &defaults).unwrap();
        assert_eq!(cc.server.as_str(), "https://society.example/api");
        assert_eq!(cc.tls, TlsVerification::SystemDefaults);
        assert_eq!(cc.timeout, Duration::from_secs(5));
        assert_eq!(cc.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn insecure_wins_over_custom_ca() {
        let mut p = profile();
        p.ca_cert = Some("/etc/society/ca.pem".into());
        let cc = profile_to_client_config(&p, &Defaults::default()).unwrap();
        assert_eq!(cc.tls, TlsVerification::CustomCa("/etc/society/ca.pem".into()));

        p.insecure = Some(true);
        let cc = profile_to_client_config(&p, &Defaults::default()).unwrap();
        assert_eq!(cc.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_server_is_rejected() {
        let mut p = profile();
        p.server = "not a url".into();
        assert!(matches!(
            profile_to_client_config(&p, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn password_resolution_order() {
        let mut p = profile();
        p.password = Some("plain".into());
        p.password_env = Some("TOWER_PW".into());

        let env_all = |name: &str| match name {
            "TOWER_PW" => Some("from-profile-env".to_string()),
            "SOCIETY_PASSWORD" => Some("from-global-env".to_string()),
            _ => None,
        };
        let keyring = |_: &str| Some("from-keyring".to_string());
        let none = |_: &str| -> Option<String> { None };

        let pw = resolve_password_with(&p, "default", env_all, keyring).unwrap();
        assert_eq!(pw.expose_secret(), "from-profile-env");

        let pw = resolve_password_with(&p, "default", none, keyring).unwrap();
        assert_eq!(pw.expose_secret(), "from-keyring");

        let pw = resolve_password_with(&p, "default", none, none).unwrap();
        assert_eq!(pw.expose_secret(), "plain");

        p.password = None;
        assert!(matches!(
            resolve_password_with(&p, "default", none, none),
            Err(ConfigError::NoCredentials { .. })
        ));
    }
}
