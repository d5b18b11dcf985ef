//! Application configuration loaded from environment variables.
//!
//! - `JWT_SETTINGS_KEY` - token signing key. May be left unset; issuing a token then fails.
//! - `JWT_SETTINGS_ISSUER` / `JWT_SETTINGS_AUDIENCE` - `iss` and `aud` claims
//! - `BIND_ADDR` - listen address (default: 0.0.0.0:3000)
//! - `DATABASE_URL` - PostgreSQL connection string; in-memory users when unset
//! - `PASSWORD_HASHER` - `sha256` (default) or `argon2`
//! - `SESSION_COOKIE_NAME` - session cookie name
//! - `SESSION_CLEANUP_INTERVAL_SECS` - how often expired sessions are purged

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use strum_macros::{Display, EnumString};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_COOKIE: &str = "account_portal_session";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Signing material for bearer tokens
#[derive(Debug, Clone, Default)]
pub struct JwtSettings {
    pub key: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl JwtSettings {
    pub fn from_env() -> Self {
        Self {
            key: std::env::var("JWT_SETTINGS_KEY").ok(),
            issuer: std::env::var("JWT_SETTINGS_ISSUER").ok(),
            audience: std::env::var("JWT_SETTINGS_AUDIENCE").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub cleanup_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            cleanup_interval: Duration::from_secs(10 * 60),
        }
    }
}

/// Which password digest scheme new and existing users are checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PasswordHasherKind {
    #[strum(serialize = "sha256")]
    Sha256,
    #[strum(serialize = "argon2")]
    Argon2,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub password_hasher: PasswordHasherKind,
    pub jwt: JwtSettings,
    pub session: SessionSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_env("BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let password_hasher = parse_env("PASSWORD_HASHER", "sha256")?;
        let cleanup_secs: u64 = parse_env("SESSION_CLEANUP_INTERVAL_SECS", "600")?;

        let session = SessionSettings {
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
            cleanup_interval: Duration::from_secs(cleanup_secs),
        };

        Ok(Self {
            bind_addr,
            database_url: std::env::var("DATABASE_URL").ok(),
            password_hasher,
            jwt: JwtSettings::from_env(),
            session,
        })
    }
}

fn parse_env<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    parse_value(name, &raw)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
}
