// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node lookup endpoints.
//!
//! Nodes are read-only. `PUT` and `DELETE` are routed so clients get a clear
//! 501 instead of a 404 or 405.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{accounts::SearchQuery, parse_id};
use crate::{error::ApiError, models::Node, state::AppState};

/// Get a node by id.
#[utoipa::path(
    get,
    path = "/nodes/{id}",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Node found", body = Node),
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody),
        (status = 404, description = "Node not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.get(id)?))
}

/// Get a node's health status.
#[utoipa::path(
    get,
    path = "/nodes/{id}/health",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Health status, e.g. `running`", body = String),
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 404, description = "Node not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_health(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.health(id)?))
}

/// Get a node's hardware info blob (JSON text).
#[utoipa::path(
    get,
    path = "/nodes/{id}/info",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Hardware info as JSON text", body = String),
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 404, description = "Node not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.info(id)?))
}

/// Get a node's performance label.
#[utoipa::path(
    get,
    path = "/nodes/{id}/perf",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Performance label", body = String),
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 404, description = "Node not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_perf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.perf(id)?))
}

/// Find the node whose address equals `q`.
#[utoipa::path(
    get,
    path = "/nodes",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Node found", body = Node),
        (status = 404, description = "Empty query or no match", body = crate::error::ErrorBody)
    )
)]
pub async fn query_node(
    State(state): State<AppState>,
    query: SearchQuery,
) -> Result<Json<Node>, ApiError> {
    let node = state.nodes.query(query.value())?;
    Ok(Json(node))
}

/// Register a node. Not supported.
#[utoipa::path(
    put,
    path = "/nodes/{id}",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 501, description = "Nodes are read-only", body = crate::error::ErrorBody)
    )
)]
pub async fn add_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.add(id)?))
}

/// Remove a node. Not supported.
#[utoipa::path(
    delete,
    path = "/nodes/{id}",
    tag = "nodes",
    security(("bearer_auth" = []), ("token_query" = [])),
    params(("id" = u64, Path, description = "Node id")),
    responses(
        (status = 400, description = "Id is not a non-negative integer", body = crate::error::ErrorBody),
        (status = 501, description = "Nodes are read-only", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.nodes.delete(id)?))
}
