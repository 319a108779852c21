// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the identity rebuilt from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity claim: the username
    pub id: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issue time of this token (Unix seconds); bounds the refresh window
    pub orig_iat: i64,
}

/// Authenticated caller, as rebuilt from a validated token.
///
/// Handlers receive it through request extensions or the
/// [`Authorized`](super::Authorized) extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self::new(claims.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_comes_from_id_claim() {
        let claims = Claims {
            id: "john".to_string(),
            exp: 1_700_003_600,
            orig_iat: 1_700_000_000,
        };
        assert_eq!(Identity::from(claims), Identity::new("john"));
    }

    #[test]
    fn claims_use_wire_names() {
        let claims = Claims {
            id: "admin".to_string(),
            exp: 2,
            orig_iat: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["id"], "admin");
        assert_eq!(json["exp"], 2);
        assert_eq!(json["orig_iat"], 1);
    }
}
