// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance, validation and refresh.
//!
//! Expiry and refresh deadlines are checked here against an explicit `now`
//! rather than by `jsonwebtoken`, so both rules share one clock and tests can
//! move it.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{AuthError, Claims, Identity};
use crate::models::TokenResponse;

/// Secret used when `METALFLOW_JWT_SECRET` is unset.
pub const DEFAULT_SECRET: &str = "metalflow";

/// Lifetime of an issued token.
pub const DEFAULT_TIMEOUT: TimeDelta = TimeDelta::hours(1);

/// How long after issuance a token may be refreshed.
pub const DEFAULT_MAX_REFRESH: TimeDelta = TimeDelta::hours(1);

const ALGORITHM: Algorithm = Algorithm::HS256;

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expire: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            code: 200,
            expire: issued.expire.to_rfc3339(),
            token: issued.token,
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    timeout: TimeDelta,
    max_refresh: TimeDelta,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            timeout: DEFAULT_TIMEOUT,
            max_refresh: DEFAULT_MAX_REFRESH,
        }
    }

    pub fn with_timeout(mut self, timeout: TimeDelta) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_refresh(mut self, max_refresh: TimeDelta) -> Self {
        self.max_refresh = max_refresh;
        self
    }

    /// Issue a token for `identity` starting now.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expire = now + self.timeout;
        let claims = Claims {
            id: identity.username.clone(),
            exp: expire.timestamp(),
            orig_iat: now.timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(IssuedToken { token, expire })
    }

    /// Validate signature and expiry, returning the caller's identity.
    pub fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.exp < now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims.into())
    }

    /// Exchange a token for a new one while its refresh window is open.
    ///
    /// The old token's expiry is not checked, only its signature and
    /// `orig_iat`. The new token gets a fresh expiry and refresh window.
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, AuthError> {
        self.refresh_at(token, Utc::now())
    }

    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let claims = self.decode_claims(token)?;
        let deadline = claims.orig_iat.saturating_add(self.max_refresh.num_seconds());
        if now.timestamp() >= deadline {
            return Err(AuthError::RefreshWindowClosed);
        }
        self.issue_at(&claims.into(), now)
    }

    /// Verify algorithm and signature and decode the claims.
    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => AuthError::InvalidSigningAlgorithm,
            ErrorKind::MissingRequiredClaim(_) => AuthError::MissingExp,
            _ => AuthError::MalformedToken,
        })?;

        if data.claims.id.is_empty() {
            return Err(AuthError::MalformedToken);
        }
        Ok(data.claims)
    }
}
