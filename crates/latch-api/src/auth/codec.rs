// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token signing and verification.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use latch_config::{ConfigError, JwtAlgorithm, SessionConfig, MIN_SECRET_BYTES};

use super::{AuthError, Claims, Identity};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// IssuedToken
// =============================================================================

/// A freshly signed token together with the claims embedded in it.
#[derive(Clone)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Claims signed into `token`.
    pub claims: Claims,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"***")
            .field("claims", &self.claims)
            .finish()
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies HMAC-signed session tokens.
///
/// Immutable after construction; clone freely, keys are shared.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    issuer: Arc<str>,
    ttl_secs: i64,
    leeway_secs: u64,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a codec from the session configuration.
    ///
    /// Fails when the secret is missing, empty or shorter than 256 bits.
    pub fn new(config: &SessionConfig) -> ApiResult<Self> {
        let secret = config.secret().ok_or(ConfigError::SecretMissing)?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                len: secret.len(),
                min: MIN_SECRET_BYTES,
            }
            .into());
        }

        let ttl_secs = i64::try_from(config.token_ttl_secs)
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| {
                ConfigError::invalid("session.token_ttl_secs", "must be positive and fit in i64")
            })?;

        let algorithm = match config.algorithm {
            JwtAlgorithm::HS256 => Algorithm::HS256,
            JwtAlgorithm::HS384 => Algorithm::HS384,
            JwtAlgorithm::HS512 => Algorithm::HS512,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Expiry is checked by `verify_at` against an explicit clock.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            algorithm,
            issuer: Arc::from(config.issuer.as_str()),
            ttl_secs,
            leeway_secs: config.leeway_secs,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a token for `identity`, valid from now for the configured TTL.
    pub fn issue(&self, identity: &Identity) -> ApiResult<IssuedToken> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issues a token for `identity` as of `now` (Unix seconds).
    pub fn issue_at(&self, identity: &Identity, now: i64) -> ApiResult<IssuedToken> {
        let claims = Claims::new(
            identity.user_id.clone(),
            identity.role,
            now,
            self.ttl_secs,
            self.issuer.as_ref(),
        );
        let token = self.encode_claims(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Signs arbitrary claims.
    pub fn encode_claims(&self, claims: &Claims) -> ApiResult<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verifies a token as of `now` (Unix seconds).
    ///
    /// Every failure collapses into [`AuthError::InvalidSession`]; the cause
    /// is only visible at debug level.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(cause = ?e.kind(), "Token verification failed");
                AuthError::InvalidSession
            })?;

        if claims.is_expired_at(now, self.leeway_secs) {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(AuthError::InvalidSession);
        }

        Ok(claims)
    }

    /// Returns the token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Returns the configured issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
