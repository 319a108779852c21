// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and token refresh endpoints.
//!
//! Both are reachable without a token. Refresh still needs a token signed by
//! this server whose refresh window is open.

use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap, Uri},
    Form, Json,
};
use tracing::{info, warn};

use crate::{
    auth::{middleware::lookup_token, AuthError},
    models::{LoginRequest, TokenResponse},
    state::AppState,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Login credentials sent as JSON or as an urlencoded form.
///
/// Any body that cannot be decoded counts as missing credentials.
pub struct LoginForm(pub LoginRequest);

impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        let login = if is_form {
            let Form(login) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|_| AuthError::MissingLoginValues)?;
            login
        } else {
            let Json(login) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|_| AuthError::MissingLoginValues)?;
            login
        };
        Ok(LoginForm(login))
    }
}

/// Exchange a username and password for a token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(
        content(
            (LoginRequest = "application/json"),
            (LoginRequest = "application/x-www-form-urlencoded")
        )
    ),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Missing or incorrect credentials", body = crate::error::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    LoginForm(login): LoginForm,
) -> Result<Json<TokenResponse>, AuthError> {
    let identity = match state.authenticator.authenticate(&login) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(username = %login.username, error = %e, "Login failed");
            return Err(e);
        }
    };

    let issued = state.tokens.issue(&identity)?;
    info!(username = %identity.username, expire = %issued.expire, "Login succeeded");
    Ok(Json(issued.into()))
}

/// Exchange a token for a new one while its refresh window is open.
#[utoipa::path(
    get,
    path = "/auth/refresh",
    tag = "auth",
    security(("bearer_auth" = []), ("token_query" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Missing or invalid token, or refresh window closed", body = crate::error::ErrorBody)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = lookup_token(&headers, &uri)?;
    let issued = state.tokens.refresh(&token).inspect_err(|e| {
        warn!(error = %e, "Token refresh failed");
    })?;
    Ok(Json(issued.into()))
}
