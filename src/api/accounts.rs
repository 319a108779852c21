// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account lookup endpoints.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    Json,
};
use utoipa::IntoParams;

use super::{parse_id, SELF_ID};
use crate::{error::ApiError, models::Account, state::AppState};

/// Query string for account and node searches.
///
/// A repeated `q` keeps its first value.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Exact value to match
    pub q: Option<String>,
}

impl SearchQuery {
    /// The value to match, empty when `q` is absent.
    pub fn value(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SearchQuery {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(format!("invalid query: {}", e.body_text())))?;
        let q = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "q").then_some(value));
        Ok(SearchQuery { q })
    }
}

/// Get an account by id, or the caller's default account for `self`.
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = String, Path, description = "Account id, or `self`")),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody),
        (status = 404, description = "Account not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account = if id == SELF_ID {
        state.accounts.get_self()?
    } else {
        let id = parse_id(&id)?;
        state.accounts.get(id)?
    };
    Ok(Json(account))
}

/// Find the account whose username equals `q`.
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody),
        (status = 404, description = "Empty query or no match", body = crate::error::ErrorBody)
    )
)]
pub async fn query_account(
    State(state): State<AppState>,
    query: SearchQuery,
) -> Result<Json<Account>, ApiError> {
    let account = state.accounts.query(query.value())?;
    Ok(Json(account))
}
