// config.rs - Daemon configuration loaded from a TOML file.
//
// Every field has a default, so an empty or missing file is a valid
// config. CLI flags and `BINGO_AUTH_SECRET` are layered on top by the
// caller.

use std::fs;
use std::path::{Path, PathBuf};

use bingo_board::BoardEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides `auth.callback_secret`.
pub const AUTH_SECRET_ENV: &str = "BINGO_AUTH_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field} must be between 1 and {MAX_TTL_DAYS} days, got {value}")]
    TtlOutOfRange { field: &'static str, value: i64 },

    #[error("invalid config: unknown event type '{0}' in events.log_kinds")]
    UnknownEventKind(String),
}

/// Upper bound for every `*_ttl_days` setting.
pub const MAX_TTL_DAYS: i64 = 3650;

/// Top-level daemon configuration (`bingo.toml`).
///
/// ```toml
/// [server]
/// bind = "0.0.0.0"
/// port = 8080
/// base_url = "https://bingo.example.com"
///
/// [database]
/// path = "/var/lib/bingo/bingo.db"
///
/// [auth]
/// session_ttl_days = 30
///
/// [invitations]
/// ttl_days = 7
///
/// [events]
/// log_path = "/var/log/bingo/events.jsonl"
/// log_kinds = ["bingo_achieved", "board_completed"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub invitations: InvitationConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public origin used to build share and invite links. Also the only
    /// origin allowed by CORS.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            base_url: default_base_url(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bingo.db")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the OAuth front end sends in `x-bingo-auth-secret`.
    /// Sign-in is refused while unset.
    #[serde(default)]
    pub callback_secret: Option<String>,
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            callback_secret: None,
            session_ttl_days: default_session_ttl_days(),
        }
    }
}

fn default_session_ttl_days() -> i64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    #[serde(default = "default_invitation_ttl_days")]
    pub ttl_days: i64,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_invitation_ttl_days(),
        }
    }
}

fn default_invitation_ttl_days() -> i64 {
    bingo_social::DEFAULT_INVITATION_TTL_DAYS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Append board events as JSONL here when set.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    /// Event types written to the log. Empty means all of them.
    #[serde(default)]
    pub log_kinds: Vec<String>,
}

impl DaemonConfig {
    /// Load from `path`, or defaults when no path is given. The
    /// `BINGO_AUTH_SECRET` environment variable is applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };
        config.apply_secret_override(std::env::var(AUTH_SECRET_ENV).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject lifetimes that would overflow timestamp arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("auth.session_ttl_days", self.auth.session_ttl_days),
            ("invitations.ttl_days", self.invitations.ttl_days),
        ] {
            if !(1..=MAX_TTL_DAYS).contains(&value) {
                return Err(ConfigError::TtlOutOfRange { field, value });
            }
        }
        if let Some(kind) = self
            .events
            .log_kinds
            .iter()
            .find(|k| !BoardEvent::KINDS.contains(&k.as_str()))
        {
            return Err(ConfigError::UnknownEventKind(kind.clone()));
        }
        Ok(())
    }

    /// Whether links and cookies are served over TLS.
    pub fn is_https(&self) -> bool {
        self.server.base_url.starts_with("https://")
    }

    /// A non-empty override replaces the configured callback secret.
    pub fn apply_secret_override(&mut self, secret: Option<String>) {
        if let Some(secret) = secret.filter(|s| !s.trim().is_empty()) {
            self.auth.callback_secret = Some(secret);
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.auth.session_ttl_days)
    }

    pub fn invitation_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.invitations.ttl_days)
    }

    /// Absolute URL for a path such as `/board/{id}?share=...`.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.server.base_url.trim_end_matches('/'), path)
    }
}
