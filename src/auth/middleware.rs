// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied per route group with `axum::middleware::from_fn_with_state`:
//!
//! ```rust,ignore
//! let accounts = Router::new()
//!     .route("/accounts/{id}", get(accounts::get_account))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_identity));
//! ```
//!
//! On success the [`Identity`] is stored in the request extensions, where the
//! [`Authorized`](super::Authorized) extractor picks it up.

use axum::{
    extract::{Query, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use super::{AuthError, Identity};
use crate::state::AppState;

/// Scheme expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Cookie carrying a token.
const TOKEN_COOKIE: &str = "jwt";

/// The `token` query parameter.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn token_from_header(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

fn token_from_query(uri: &Uri) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
}

fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Find the request's token: header, then `token` query, then `jwt` cookie.
///
/// A malformed `Authorization` header is only reported when no later source
/// supplies a token.
pub fn lookup_token(headers: &HeaderMap, uri: &Uri) -> Result<String, AuthError> {
    let header = token_from_header(headers);
    if let Ok(Some(token)) = header {
        return Ok(token);
    }
    if let Some(token) = token_from_query(uri) {
        return Ok(token);
    }
    if let Some(token) = token_from_cookie(headers) {
        return Ok(token);
    }
    match header {
        Err(err) => Err(err),
        Ok(_) => Err(AuthError::MissingToken),
    }
}

/// Authenticate and authorize a request from its headers and URI.
pub fn authorize_request(
    headers: &HeaderMap,
    uri: &Uri,
    state: &AppState,
) -> Result<Identity, AuthError> {
    let token = lookup_token(headers, uri)?;
    let identity = state.tokens.validate(&token)?;
    if !state.policy.authorize(&identity) {
        debug!(username = %identity.username, path = %uri.path(), "Authorization denied");
        return Err(AuthError::Forbidden);
    }
    Ok(identity)
}

/// Authentication middleware function.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize_request(request.headers(), request.uri(), &state) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request as HttpRequest};

    fn parts(builder: axum::http::request::Builder) -> axum::http::request::Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_token_wins() {
        let p = parts(
            HttpRequest::builder()
                .uri("/accounts/1?token=from-query")
                .header(AUTHORIZATION, "Bearer from-header")
                .header(COOKIE, "jwt=from-cookie"),
        );
        assert_eq!(lookup_token(&p.headers, &p.uri).unwrap(), "from-header");
    }

    #[test]
    fn query_beats_cookie() {
        let p = parts(
            HttpRequest::builder()
                .uri("/accounts/1?q=x&token=from-query")
                .header(COOKIE, "jwt=from-cookie"),
        );
        assert_eq!(lookup_token(&p.headers, &p.uri).unwrap(), "from-query");
    }

    #[test]
    fn cookie_is_last_resort() {
        let p = parts(
            HttpRequest::builder()
                .uri("/accounts/1")
                .header(COOKIE, "theme=dark; jwt=from-cookie; lang=en"),
        );
        assert_eq!(lookup_token(&p.headers, &p.uri).unwrap(), "from-cookie");
    }

    #[test]
    fn malformed_header_falls_through_to_other_sources() {
        let p = parts(
            HttpRequest::builder()
                .uri("/accounts/1?token=from-query")
                .header(AUTHORIZATION, "Basic dXNlcjpwYXNz"),
        );
        assert_eq!(lookup_token(&p.headers, &p.uri).unwrap(), "from-query");

        let p = parts(
            HttpRequest::builder()
                .uri("/accounts/1")
                .header(AUTHORIZATION, "Basic dXNlcjpwYXNz"),
        );
        assert!(matches!(
            lookup_token(&p.headers, &p.uri),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn no_token_anywhere_is_missing() {
        let p = parts(HttpRequest::builder().uri("/accounts/1?token="));
        assert!(matches!(
            lookup_token(&p.headers, &p.uri),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn non_ascii_header_is_invalid() {
        let mut p = parts(HttpRequest::builder().uri("/"));
        p.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert!(matches!(
            lookup_token(&p.headers, &p.uri),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn authorize_request_rejects_non_admin() {
        let state = AppState::default();
        let token = state.tokens.issue(&Identity::new("john")).unwrap().token;
        let p = parts(
            HttpRequest::builder()
                .uri("/nodes/0")
                .header(AUTHORIZATION, format!("Bearer {token}")),
        );
        assert!(matches!(
            authorize_request(&p.headers, &p.uri, &state),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn authorize_request_accepts_admin() {
        let state = AppState::default();
        let token = state.tokens.issue(&Identity::new("admin")).unwrap().token;
        let p = parts(HttpRequest::builder().uri(format!("/nodes/0?token={token}")));
        let identity = authorize_request(&p.headers, &p.uri, &state).unwrap();
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn authorize_request_follows_configured_policy() {
        let state = AppState::default().with_policy(crate::auth::PrivilegedUser::new("john"));
        let token = state.tokens.issue(&Identity::new("john")).unwrap().token;
        let p = parts(HttpRequest::builder().uri("/").header(COOKIE, format!("jwt={token}")));
        assert_eq!(
            authorize_request(&p.headers, &p.uri, &state).unwrap().username,
            "john"
        );
    }
}
