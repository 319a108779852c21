// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authorized callers.
//!
//! ```rust,ignore
//! async fn my_handler(Authorized(identity): Authorized) -> impl IntoResponse {
//!     // identity passed token validation and the access policy
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authorize_request, AuthError, Identity};
use crate::state::AppState;

/// Extractor for a caller that holds a valid token and passes the policy.
///
/// Reuses the identity stored by [`require_identity`](super::require_identity)
/// when the middleware already ran, otherwise authenticates the request
/// itself.
#[derive(Debug, Clone)]
pub struct Authorized(pub Identity);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>().cloned() {
            return Ok(Authorized(identity));
        }

        let identity = authorize_request(&parts.headers, &parts.uri, state)?;
        Ok(Authorized(identity))
    }
}
