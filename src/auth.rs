// ABOUTME: Bearer token verification against the external identity provider's signing key
// ABOUTME: Decodes JWT claims into the authenticated principal used to scope every request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Authentication
//!
//! Identity is delegated to an external OIDC provider. This module only
//! verifies the bearer tokens it issues (HS256 shared secret or RS256 public
//! key) and reads the claims the server needs: the subject, optional email and
//! name, and the roles that grant reference-data writes.

use std::collections::HashSet;
use std::fs;

use http::{header, HeaderMap};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{AuthConfig, JwtAlgorithm};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

/// Claims read from a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier assigned by the identity provider
    pub sub: String,
    /// Email address, when the provider includes it
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, when the provider includes it
    #[serde(default)]
    pub name: Option<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Every other claim, including the configurable roles claim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Roles carried in `claim`, accepting either an array or a single string
    #[must_use]
    pub fn roles(&self, claim: &str) -> HashSet<String> {
        match self.extra.get(claim) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            Some(Value::String(single)) => single
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
            _ => HashSet::new(),
        }
    }
}

/// The verified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Subject identifier
    pub subject: String,
    /// Email claim
    pub email: Option<String>,
    /// Name claim
    pub name: Option<String>,
    /// Whether the caller holds the administrator role
    pub is_admin: bool,
}

/// Verifies bearer tokens with the configured key and validation rules
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    admin_role: String,
    roles_claim: String,
}

impl TokenVerifier {
    /// Build a verifier from authentication configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key material is missing or cannot be read
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let (algorithm, key) = match config.algorithm {
            JwtAlgorithm::HS256 => {
                let secret = config
                    .jwt_secret
                    .as_deref()
                    .ok_or_else(|| AppError::config("JWT_SECRET is required for HS256"))?;
                (Algorithm::HS256, DecodingKey::from_secret(secret.as_bytes()))
            }
            JwtAlgorithm::RS256 => {
                let path = config.public_key_path.as_ref().ok_or_else(|| {
                    AppError::config("JWT_PUBLIC_KEY_PATH is required for RS256")
                })?;
                let pem = fs::read(path).map_err(|e| {
                    AppError::config(format!(
                        "Failed to read public key {}: {e}",
                        path.display()
                    ))
                })?;
                let key = DecodingKey::from_rsa_pem(&pem).map_err(|e| {
                    AppError::config(format!("Invalid RSA public key {}: {e}", path.display()))
                })?;
                (Algorithm::RS256, key)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key,
            validation,
            admin_role: config.admin_role.clone(),
            roles_claim: config.roles_claim.clone(),
        })
    }

    /// Verify a raw token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AUTH_EXPIRED` for expired tokens and `AUTH_INVALID` for any
    /// other verification failure
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_expired(),
                ErrorKind::InvalidSignature => {
                    AppLogger::log_token_rejected("invalid_signature", &e.to_string());
                    AppError::auth_invalid("Bearer token signature is invalid")
                }
                ErrorKind::InvalidIssuer => AppError::auth_invalid("Bearer token issuer is not trusted"),
                ErrorKind::InvalidAudience => {
                    AppError::auth_invalid("Bearer token audience does not match")
                }
                _ => {
                    tracing::debug!(error = %e, "Bearer token rejected");
                    AppError::auth_invalid("Bearer token is invalid")
                }
            })
    }

    /// Authenticate a request from its `Authorization` header
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` when no bearer token is present, otherwise the
    /// errors of [`Self::verify`]
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<Principal> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token)?;
        let is_admin = claims.roles(&self.roles_claim).contains(&self.admin_role);
        Ok(Principal {
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            is_admin,
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` when the header is absent and `AUTH_INVALID` when it
/// is not a bearer credential
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid ASCII"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use the Bearer scheme"))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AppError::auth_invalid(
            "Authorization header must use the Bearer scheme",
        ));
    }
    Ok(token.trim())
}
