// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;

/// `WWW-Authenticate` value sent with every 401 response.
pub const CHALLENGE: &str = "JWT realm=metalflow";

/// Authentication and authorization failures.
///
/// Every variant except [`AuthError::Forbidden`] and
/// [`AuthError::Internal`] maps to 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login payload lacks a username or password
    #[error("missing Username or Password")]
    MissingLoginValues,
    /// Unknown user or wrong password
    #[error("incorrect Username or Password")]
    FailedAuthentication,
    /// No token in header, query or cookie
    #[error("token not found in header, query or cookie")]
    MissingToken,
    /// Authorization header present but not `Bearer <token>`
    #[error("auth header is invalid")]
    InvalidAuthHeader,
    /// Token cannot be decoded
    #[error("token is malformed")]
    MalformedToken,
    /// Token signature does not match the signing secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token signed with another algorithm
    #[error("invalid signing algorithm")]
    InvalidSigningAlgorithm,
    /// Token carries no `exp` claim
    #[error("missing exp field")]
    MissingExp,
    /// Token is past its expiry
    #[error("token is expired")]
    TokenExpired,
    /// Token is past its maximum refresh deadline
    #[error("token is past its refresh window")]
    RefreshWindowClosed,
    /// Valid identity without access to the resource
    #[error("you don't have permission to access this resource")]
    Forbidden,
    /// Token could not be produced
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
        }
        response
    }
}
