// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! Environment-based configuration management for production deployment

use crate::constants::defaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Read `ENVIRONMENT`, defaulting to development
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_str_or_default(&env_var_or("ENVIRONMENT", "development"))
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// # Errors
    ///
    /// Returns an error for URLs naming a backend other than `SQLite`
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" || path_str.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.contains("://") {
            Err(anyhow::anyhow!(
                "Unsupported DATABASE_URL scheme (only sqlite: is supported): {s}"
            ))
        } else {
            // Bare paths are treated as SQLite files
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/liftlog.db"),
        }
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Signature algorithm expected on bearer tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JwtAlgorithm {
    /// HMAC-SHA256 with a shared secret
    #[default]
    HS256,
    /// RSA-SHA256 with the provider's public key
    RS256,
}

impl FromStr for JwtAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "RS256" => Ok(Self::RS256),
            other => Err(anyhow::anyhow!("Unsupported JWT_ALGORITHM: {other}")),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// HTTP behaviour
    pub http: HttpConfig,
    /// Request pipeline behaviour
    pub pipeline: PipelineConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size for file databases
    pub max_connections: u32,
}

/// Bearer token verification settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected signature algorithm
    pub algorithm: JwtAlgorithm,
    /// Shared secret for HS256
    pub jwt_secret: Option<String>,
    /// PEM public key file for RS256
    pub public_key_path: Option<PathBuf>,
    /// Expected `iss` claim
    pub issuer: Option<String>,
    /// Expected `aud` claim
    pub audience: Option<String>,
    /// Role granting reference-data writes
    pub admin_role: String,
    /// Claim that carries roles
    pub roles_claim: String,
    /// Tolerated clock skew in seconds
    pub leeway_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("algorithm", &self.algorithm)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("public_key_path", &self.public_key_path)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("admin_role", &self.admin_role)
            .field("roles_claim", &self.roles_claim)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// HTTP layer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Seconds before a request times out
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

/// Request pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Executions slower than this are logged at warn
    pub slow_request_threshold_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            environment: Environment::Development,
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
                max_connections: defaults::DATABASE_MAX_CONNECTIONS,
            },
            auth: AuthConfig {
                algorithm: JwtAlgorithm::HS256,
                jwt_secret: None,
                public_key_path: None,
                issuer: None,
                audience: None,
                admin_role: defaults::ADMIN_ROLE.to_owned(),
                roles_claim: defaults::ROLES_CLAIM.to_owned(),
                leeway_secs: defaults::JWT_LEEWAY_SECS,
            },
            http: HttpConfig {
                cors_origins: vec![defaults::CORS_ORIGINS.to_owned()],
                request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
                max_body_bytes: defaults::MAX_BODY_BYTES,
            },
            pipeline: PipelineConfig {
                slow_request_threshold_ms: defaults::SLOW_REQUEST_THRESHOLD_MS,
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails validation
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: env_var_or("HOST", defaults::HOST),
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            environment: Environment::from_env(),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL))?,
                max_connections: parse_env(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults::DATABASE_MAX_CONNECTIONS,
                )?,
            },
            auth: AuthConfig {
                algorithm: env_var_or("JWT_ALGORITHM", "HS256").parse()?,
                jwt_secret: non_empty_var("JWT_SECRET"),
                public_key_path: non_empty_var("JWT_PUBLIC_KEY_PATH").map(PathBuf::from),
                issuer: non_empty_var("OIDC_ISSUER"),
                audience: non_empty_var("OIDC_AUDIENCE"),
                admin_role: env_var_or("ADMIN_ROLE", defaults::ADMIN_ROLE),
                roles_claim: env_var_or("ROLES_CLAIM", defaults::ROLES_CLAIM),
                leeway_secs: parse_env("JWT_LEEWAY_SECS", defaults::JWT_LEEWAY_SECS)?,
            },
            http: HttpConfig {
                cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", defaults::CORS_ORIGINS)),
                request_timeout_secs: parse_env(
                    "REQUEST_TIMEOUT_SECS",
                    defaults::REQUEST_TIMEOUT_SECS,
                )?,
                max_body_bytes: parse_env("MAX_BODY_BYTES", defaults::MAX_BODY_BYTES)?,
            },
            pipeline: PipelineConfig {
                slow_request_threshold_ms: parse_env(
                    "SLOW_REQUEST_THRESHOLD_MS",
                    defaults::SLOW_REQUEST_THRESHOLD_MS,
                )?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when the port is zero or the key material for the
    /// selected JWT algorithm is missing
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow::anyhow!("HTTP_PORT must not be 0"));
        }

        match self.auth.algorithm {
            JwtAlgorithm::HS256 if self.auth.jwt_secret.is_none() => {
                return Err(anyhow::anyhow!("JWT_ALGORITHM=HS256 requires JWT_SECRET"));
            }
            JwtAlgorithm::RS256 if self.auth.public_key_path.is_none() => {
                return Err(anyhow::anyhow!(
                    "JWT_ALGORITHM=RS256 requires JWT_PUBLIC_KEY_PATH"
                ));
            }
            _ => {}
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be at least 1"));
        }

        if self.auth.audience.is_none() {
            warn!("OIDC_AUDIENCE is not set; tokens for any audience will be accepted");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "LiftLog Server Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - JWT Algorithm: {:?}\n\
             - Issuer: {}\n\
             - Audience: {}\n\
             - Admin Role: {}\n\
             - CORS Origins: {}\n\
             - Request Timeout: {}s",
            self.host,
            self.http_port,
            self.environment,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.auth.algorithm,
            self.auth.issuer.as_deref().unwrap_or("<any>"),
            self.auth.audience.as_deref().unwrap_or("<any>"),
            self.auth.admin_role,
            self.http.cors_origins.join(","),
            self.http.request_timeout_secs,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Environment variable that is set and not blank
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated origins
fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
