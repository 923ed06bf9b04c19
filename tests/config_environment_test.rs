// ABOUTME: Tests for loading server configuration from environment variables
// ABOUTME: Serialized because every test mutates the process environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::env;
use std::path::PathBuf;

use liftlog_server::config::{DatabaseUrl, Environment, JwtAlgorithm, ServerConfig};
use liftlog_server::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "HOST",
    "HTTP_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "JWT_ALGORITHM",
    "JWT_SECRET",
    "JWT_PUBLIC_KEY_PATH",
    "OIDC_ISSUER",
    "OIDC_AUDIENCE",
    "ADMIN_ROLE",
    "ROLES_CLAIM",
    "JWT_LEEWAY_SECS",
    "CORS_ORIGINS",
    "REQUEST_TIMEOUT_SECS",
    "MAX_BODY_BYTES",
    "SLOW_REQUEST_THRESHOLD_MS",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_with_only_a_secret() {
    clear_env();
    env::set_var("JWT_SECRET", "env-secret");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/liftlog.db")
        }
    );
    assert_eq!(config.auth.algorithm, JwtAlgorithm::HS256);
    assert_eq!(config.auth.admin_role, "admin");
    assert_eq!(config.auth.roles_claim, "roles");
    assert_eq!(config.http.cors_origins, vec!["*"]);

    clear_env();
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("JWT_SECRET", "env-secret");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("OIDC_ISSUER", "https://issuer.example");
    env::set_var("OIDC_AUDIENCE", "liftlog");
    env::set_var("ADMIN_ROLE", "liftlog-admin");
    env::set_var("CORS_ORIGINS", "https://a.example, https://b.example");
    env::set_var("SLOW_REQUEST_THRESHOLD_MS", "250");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert!(config.environment.is_production());
    assert!(config.database.url.is_memory());
    assert_eq!(config.auth.issuer.as_deref(), Some("https://issuer.example"));
    assert_eq!(config.auth.audience.as_deref(), Some("liftlog"));
    assert_eq!(config.auth.admin_role, "liftlog-admin");
    assert_eq!(
        config.http.cors_origins,
        vec!["https://a.example", "https://b.example"]
    );
    assert_eq!(config.pipeline.slow_request_threshold_ms, 250);

    clear_env();
}

#[test]
#[serial]
fn test_environment_selects_default_log_format() {
    clear_env();
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Full);

    env::set_var("ENVIRONMENT", "prod");
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Json);

    env::set_var("LOG_FORMAT", "compact");
    assert_eq!(LoggingConfig::from_env().format, LogFormat::Compact);

    clear_env();
}

#[test]
#[serial]
fn test_missing_key_material_is_rejected() {
    clear_env();
    assert!(ServerConfig::from_env().is_err());

    env::set_var("JWT_ALGORITHM", "RS256");
    env::set_var("JWT_SECRET", "ignored-for-rs256");
    let error = ServerConfig::from_env().unwrap_err();
    assert!(error.to_string().contains("JWT_PUBLIC_KEY_PATH"));

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_values_are_rejected() {
    clear_env();
    env::set_var("JWT_SECRET", "env-secret");

    env::set_var("HTTP_PORT", "not-a-port");
    assert!(ServerConfig::from_env().is_err());
    env::remove_var("HTTP_PORT");

    env::set_var("JWT_ALGORITHM", "ES512");
    assert!(ServerConfig::from_env().is_err());
    env::remove_var("JWT_ALGORITHM");

    env::set_var("DATABASE_URL", "postgres://localhost/liftlog");
    assert!(ServerConfig::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_blank_secret_counts_as_unset() {
    clear_env();
    env::set_var("JWT_SECRET", "   ");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}
