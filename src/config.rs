// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AuthSettings`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Global token signing secret | Required |
//! | `JWT_ACCESS_TTL_SECS` | Access token lifetime in seconds (1 to one year) | `1800` |
//! | `JWT_REFRESH_TTL_SECS` | Refresh token lifetime in seconds, longer than the access lifetime | `1209600` |
//! | `JWT_ACCESS_HEADER` | Header carrying the access token | `Authorization` |
//! | `JWT_REFRESH_HEADER` | Header carrying the refresh token | `Authorization-refresh` |
//! | `AUTH_BYPASS_PATHS` | Comma-separated unauthenticated paths | `/,/login,/signUp,/health` |
//! | `BCRYPT_COST` | bcrypt work factor for new password hashes | `12` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ACCESS_TTL_ENV: &str = "JWT_ACCESS_TTL_SECS";
pub const JWT_REFRESH_TTL_ENV: &str = "JWT_REFRESH_TTL_SECS";
pub const JWT_ACCESS_HEADER_ENV: &str = "JWT_ACCESS_HEADER";
pub const JWT_REFRESH_HEADER_ENV: &str = "JWT_REFRESH_HEADER";
pub const AUTH_BYPASS_PATHS_ENV: &str = "AUTH_BYPASS_PATHS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Access tokens live for 30 minutes unless configured otherwise.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 30 * 60;

/// Refresh tokens live for 14 days unless configured otherwise.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// Upper bound accepted for either token lifetime (one year).
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

pub const DEFAULT_ACCESS_HEADER: &str = "Authorization";
pub const DEFAULT_REFRESH_HEADER: &str = "Authorization-refresh";

/// Routes reachable without any token processing.
pub const DEFAULT_BYPASS_PATHS: &[&str] = &["/", "/login", "/signUp", "/health"];

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Token and filter configuration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Global signing secret, combined with each user's credential hash
    pub secret: String,
    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: i64,
    /// Header name for access tokens (requests and responses)
    pub access_header: String,
    /// Header name for refresh tokens (requests and responses)
    pub refresh_header: String,
    /// Paths that skip the authentication filter entirely
    pub bypass_paths: Vec<String>,
}

impl AuthSettings {
    /// Create settings with the given secret and default lifetimes/headers.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            access_header: DEFAULT_ACCESS_HEADER.to_string(),
            refresh_header: DEFAULT_REFRESH_HEADER.to_string(),
            bypass_paths: DEFAULT_BYPASS_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var(JWT_SECRET_ENV).map_err(|_| ConfigError::Missing(JWT_SECRET_ENV))?;
        if secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: JWT_SECRET_ENV,
                value: String::new(),
            });
        }

        let mut settings = Self::new(secret);

        if let Some(ttl) = parse_env::<i64>(JWT_ACCESS_TTL_ENV)? {
            settings.access_ttl_secs = check_ttl(JWT_ACCESS_TTL_ENV, ttl)?;
        }
        if let Some(ttl) = parse_env::<i64>(JWT_REFRESH_TTL_ENV)? {
            settings.refresh_ttl_secs = check_ttl(JWT_REFRESH_TTL_ENV, ttl)?;
        }
        check_ttl_order(settings.access_ttl_secs, settings.refresh_ttl_secs)?;
        if let Ok(header) = env::var(JWT_ACCESS_HEADER_ENV) {
            settings.access_header = header;
        }
        if let Ok(header) = env::var(JWT_REFRESH_HEADER_ENV) {
            settings.refresh_header = header;
        }
        if let Ok(paths) = env::var(AUTH_BYPASS_PATHS_ENV) {
            settings.bypass_paths = parse_path_list(&paths);
        }

        Ok(settings)
    }

    /// Set the access token lifetime.
    pub fn with_access_ttl(mut self, secs: i64) -> Self {
        self.access_ttl_secs = secs;
        self
    }

    /// Set the refresh token lifetime.
    pub fn with_refresh_ttl(mut self, secs: i64) -> Self {
        self.refresh_ttl_secs = secs;
        self
    }

    /// Whether the filter should skip this path (exact match).
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths.iter().any(|p| p == path)
    }
}

/// Read the bcrypt cost from the environment, falling back to the crate default.
pub fn bcrypt_cost_from_env() -> Result<u32, ConfigError> {
    Ok(parse_env::<u32>(BCRYPT_COST_ENV)?.unwrap_or(bcrypt::DEFAULT_COST))
}

fn parse_env<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

/// Lifetimes must be positive and at most [`MAX_TTL_SECS`].
fn check_ttl(name: &'static str, secs: i64) -> Result<i64, ConfigError> {
    if secs <= 0 || secs > MAX_TTL_SECS {
        return Err(ConfigError::Invalid {
            name,
            value: secs.to_string(),
        });
    }
    Ok(secs)
}

/// A refresh token has to outlive the access tokens it re-issues.
fn check_ttl_order(access_secs: i64, refresh_secs: i64) -> Result<(), ConfigError> {
    if refresh_secs <= access_secs {
        return Err(ConfigError::Invalid {
            name: JWT_REFRESH_TTL_ENV,
            value: refresh_secs.to_string(),
        });
    }
    Ok(())
}

fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let settings = AuthSettings::new("secret");
        assert_eq!(settings.secret, "secret");
        assert_eq!(settings.access_ttl_secs, DEFAULT_ACCESS_TTL_SECS);
        assert_eq!(settings.refresh_ttl_secs, DEFAULT_REFRESH_TTL_SECS);
        assert_eq!(settings.access_header, "Authorization");
        assert_eq!(settings.refresh_header, "Authorization-refresh");
    }

    #[test]
    fn builder_overrides_lifetimes() {
        let settings = AuthSettings::new("secret")
            .with_access_ttl(600)
            .with_refresh_ttl(3600);
        assert_eq!(settings.access_ttl_secs, 600);
        assert_eq!(settings.refresh_ttl_secs, 3600);
    }

    #[test]
    fn bypass_is_exact_match() {
        let settings = AuthSettings::new("secret");
        assert!(settings.is_bypassed("/"));
        assert!(settings.is_bypassed("/login"));
        assert!(settings.is_bypassed("/signUp"));
        assert!(!settings.is_bypassed("/login/extra"));
        assert!(!settings.is_bypassed("/user/info"));
    }

    #[test]
    fn path_list_skips_blanks() {
        assert_eq!(
            parse_path_list(" /, /login ,, /docs "),
            vec!["/".to_string(), "/login".to_string(), "/docs".to_string()]
        );
    }

    #[test]
    fn ttl_must_be_positive_and_bounded() {
        assert_eq!(check_ttl(JWT_ACCESS_TTL_ENV, 600).unwrap(), 600);
        assert_eq!(check_ttl(JWT_ACCESS_TTL_ENV, MAX_TTL_SECS).unwrap(), MAX_TTL_SECS);
        assert!(matches!(
            check_ttl(JWT_ACCESS_TTL_ENV, -5),
            Err(ConfigError::Invalid { name: JWT_ACCESS_TTL_ENV, .. })
        ));
        assert!(check_ttl(JWT_ACCESS_TTL_ENV, 0).is_err());
        assert!(check_ttl(JWT_REFRESH_TTL_ENV, i64::MAX).is_err());
    }

    #[test]
    fn refresh_ttl_must_exceed_access_ttl() {
        assert!(check_ttl_order(DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS).is_ok());
        assert!(matches!(
            check_ttl_order(600, 600),
            Err(ConfigError::Invalid { name: JWT_REFRESH_TTL_ENV, .. })
        ));
        assert!(check_ttl_order(3600, 600).is_err());
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::Missing(JWT_SECRET_ENV).to_string(),
            "JWT_SECRET environment variable not set"
        );
    }
}
