// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::config::SERVER_VERSION;

/// Server version as `<version>-build-<build>`.
#[utoipa::path(
    get,
    path = "/config/server/version",
    tag = "config",
    security(("bearer_auth" = []), ("token_query" = [])),
    responses(
        (status = 200, description = "Server version", body = String, example = json!("0.1.0-build-dev")),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody)
    )
)]
pub async fn server_version() -> Json<&'static str> {
    Json(SERVER_VERSION)
}
