// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed settings loaded from them at startup. Settings are read once and
//! never change for the lifetime of the process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret used to sign bearer tokens | Required |
//! | `JWT_EXPIRATION_SECONDS` | Token time-to-live in seconds | `3600` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_ADMIN` | Create the default admin on an empty directory | `true` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated browser origins allowed by CORS | `http://localhost:5173,http://localhost:8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderValue;

/// Environment variable holding the token signing secret.
///
/// The value is used verbatim as UTF-8 bytes. It is never logged.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable holding the token time-to-live in seconds.
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_SECONDS";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_ADMIN_ENV: &str = "SEED_ADMIN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable listing allowed CORS origins.
///
/// Each entry must be a full `http://` or `https://` origin.
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

/// Default token lifetime (one hour).
pub const DEFAULT_TTL_SECONDS: u32 = 3600;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
/// Vite dev server and the bundled frontend.
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    MissingSecret(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Token signing secret.
///
/// Guaranteed non-empty. `Debug` output is redacted.
#[derive(Clone)]
pub struct SecretKey(Arc<[u8]>);

impl SecretKey {
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(ConfigError::MissingSecret(JWT_SECRET_ENV));
        }
        Ok(Self(Arc::from(bytes)))
    }

    /// Build a key from text, rejecting blank strings.
    pub fn from_text(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret(JWT_SECRET_ENV));
        }
        Self::new(secret.as_bytes())
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Settings consumed by the token service.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: SecretKey,
    pub ttl_seconds: u32,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_optional)
    }

    /// Load from an arbitrary variable source. Values are trimmed and empty
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret(JWT_SECRET_ENV))?;
        let secret = SecretKey::from_text(&secret)?;

        let ttl_seconds = match lookup(JWT_EXPIRATION_ENV) {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_TTL_SECONDS,
        };

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }
}

fn parse_ttl(raw: &str) -> Result<u32, ConfigError> {
    let ttl: u32 = raw.parse().map_err(|e| ConfigError::InvalidValue {
        name: JWT_EXPIRATION_ENV,
        reason: format!("{e}"),
    })?;
    if ttl == 0 {
        return Err(ConfigError::InvalidValue {
            name: JWT_EXPIRATION_ENV,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(ttl)
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process-level server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub seed_admin: bool,
    pub log_format: LogFormat,
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_optional)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };
        let seed_admin = lookup(SEED_ADMIN_ENV)
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);
        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let cors_allowed_origins = parse_origins(
            lookup(CORS_ALLOWED_ORIGINS_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_CORS_ALLOWED_ORIGINS),
        )?;

        Ok(Self {
            host,
            port,
            seed_admin,
            log_format,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: CORS_ALLOWED_ORIGINS_ENV,
        reason,
    };

    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(invalid(format!("{origin} is not an http(s) origin")));
            }
            HeaderValue::from_str(origin).map_err(|e| invalid(format!("{origin}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(invalid("no origins listed".to_string()));
    }
    Ok(origins)
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
