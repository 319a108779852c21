// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policy for protected routes.

use super::Identity;

/// Username allowed through protected routes by default.
pub const PRIVILEGED_USERNAME: &str = "admin";

/// Decides whether an authenticated identity may use protected routes.
///
/// Runs after token validation. A `false` answer becomes a 403,
/// independent of how fresh the token is.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, identity: &Identity) -> bool;
}

/// Admits exactly one username.
#[derive(Debug, Clone)]
pub struct PrivilegedUser {
    username: String,
}

impl PrivilegedUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl Default for PrivilegedUser {
    fn default() -> Self {
        Self::new(PRIVILEGED_USERNAME)
    }
}

impl Authorizer for PrivilegedUser {
    fn authorize(&self, identity: &Identity) -> bool {
        identity.username == self.username
    }
}
