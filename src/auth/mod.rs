// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for the metalflow API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `username`/`password` to `/auth/login`
//! 2. [`Authenticator`] checks the credentials against the account repository
//! 3. [`TokenIssuer`] signs an HS256 token carrying the username (`id`), the
//!    expiry (`exp`) and the original issue time (`orig_iat`)
//! 4. Later requests present the token through, in order of precedence:
//!    - `Authorization: Bearer <token>` header
//!    - `token` query parameter
//!    - `jwt` cookie
//! 5. The middleware validates the token, rebuilds the [`Identity`] and asks
//!    the [`Authorizer`] whether it may use protected routes
//!
//! ## Token Lifetime
//!
//! - Tokens expire one hour after issuance, with no clock-skew leeway
//! - `/auth/refresh` exchanges a token for a new one while
//!   `now < orig_iat + max_refresh` (one hour), even if it has expired
//!
//! There is no session store or revocation list. All state lives in the
//! signed token.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod policy;
pub mod token;

pub use claims::{Claims, Identity};
pub use credentials::Authenticator;
pub use error::AuthError;
pub use extractor::Authorized;
pub use middleware::require_identity;
pub use policy::{Authorizer, PrivilegedUser};
pub use token::{IssuedToken, TokenIssuer};
