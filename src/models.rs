// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Accounts**: Operator accounts that can sign in
//! - **Nodes**: Bare-metal machines tracked by the inventory
//! - **Auth**: Login payloads and issued tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Account Models
// =============================================================================

/// An operator account.
///
/// The password is stored and compared in plaintext. It is serialized like
/// every other field, so account endpoints must stay behind admin auth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Account {
    /// Avatar image URL.
    pub avatar: String,
    /// Name shown in the UI.
    pub displayname: String,
    /// Contact email (may be empty).
    pub email: String,
    /// Unique account identifier.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
    /// Login name, unique across accounts.
    pub username: String,
}

// =============================================================================
// Node Models
// =============================================================================

/// A bare-metal node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Node {
    /// Network address of the node.
    pub address: String,
    /// Asset tag.
    pub asset: String,
    /// Free-text comment.
    pub comments: String,
    /// Health status, e.g. `running` or `stop`.
    pub health: String,
    /// Unique node identifier.
    pub id: u64,
    /// Opaque info blob (JSON text describing the hardware).
    pub info: String,
    /// Performance label.
    pub perf: String,
    /// Region label.
    pub region: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Login credentials, accepted as JSON or as a urlencoded form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Token issued by `/auth/login` and `/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// HTTP status code, always 200.
    pub code: u16,
    /// Expiry of the token (RFC3339).
    pub expire: String,
    /// Signed bearer token.
    pub token: String,
}
