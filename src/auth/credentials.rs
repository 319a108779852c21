// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password verification against the account repository.

use std::sync::Arc;

use super::{AuthError, Identity};
use crate::models::LoginRequest;
use crate::repository::AccountRepository;

/// Checks login credentials.
///
/// Passwords are compared as plaintext, exactly as stored in the account
/// seed. No hashing, no rate limiting.
#[derive(Clone)]
pub struct Authenticator {
    accounts: Arc<dyn AccountRepository>,
}

impl Authenticator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub fn authenticate(&self, login: &LoginRequest) -> Result<Identity, AuthError> {
        if login.username.is_empty() || login.password.is_empty() {
            return Err(AuthError::MissingLoginValues);
        }

        let account = self
            .accounts
            .query(&login.username)
            .map_err(|_| AuthError::FailedAuthentication)?;

        if account.username == login.username && account.password == login.password {
            Ok(Identity::new(account.username))
        } else {
            Err(AuthError::FailedAuthentication)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SeedAccounts;

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(SeedAccounts::default()))
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn seeded_credentials_authenticate() {
        let identity = authenticator().authenticate(&login("admin", "admin")).unwrap();
        assert_eq!(identity.username, "admin");

        let identity = authenticator().authenticate(&login("john", "john")).unwrap();
        assert_eq!(identity.username, "john");
    }

    #[test]
    fn wrong_password_fails() {
        assert!(matches!(
            authenticator().authenticate(&login("admin", "john")),
            Err(AuthError::FailedAuthentication)
        ));
    }

    #[test]
    fn unknown_user_fails() {
        assert!(matches!(
            authenticator().authenticate(&login("root", "admin")),
            Err(AuthError::FailedAuthentication)
        ));
    }

    #[test]
    fn empty_fields_are_missing_values() {
        assert!(matches!(
            authenticator().authenticate(&login("", "admin")),
            Err(AuthError::MissingLoginValues)
        ));
        assert!(matches!(
            authenticator().authenticate(&login("admin", "")),
            Err(AuthError::MissingLoginValues)
        ));
    }
}
