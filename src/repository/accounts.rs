// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account repository backed by the seeded account list.

use super::{RepositoryError, RepositoryResult};
use crate::models::Account;

/// Avatar shared by the seeded accounts.
const DEFAULT_AVATAR: &str =
    "https://user-images.githubusercontent.com/334891/29999089-2837c968-9009-11e7-92c1-6a7540a594d5.png";

/// Id of the account returned for `/accounts/self`.
const SELF_ID: u64 = 0;

/// Read access to operator accounts.
pub trait AccountRepository: Send + Sync {
    /// Get an account by id.
    fn get(&self, id: u64) -> RepositoryResult<Account>;

    /// Get the account of the default identity.
    fn get_self(&self) -> RepositoryResult<Account>;

    /// Find the account whose username equals `q`.
    fn query(&self, q: &str) -> RepositoryResult<Account>;
}

/// In-memory accounts, scanned linearly.
#[derive(Debug, Clone)]
pub struct SeedAccounts {
    accounts: Vec<Account>,
    self_id: u64,
}

impl SeedAccounts {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            self_id: SELF_ID,
        }
    }
}

impl Default for SeedAccounts {
    fn default() -> Self {
        Self::new(vec![
            Account {
                avatar: DEFAULT_AVATAR.to_string(),
                displayname: "Administrator".to_string(),
                email: String::new(),
                id: 0,
                name: "Administrator".to_string(),
                password: "admin".to_string(),
                username: "admin".to_string(),
            },
            Account {
                avatar: DEFAULT_AVATAR.to_string(),
                displayname: "Super John".to_string(),
                email: "john.doe@example.com".to_string(),
                id: 1,
                name: "John Doe".to_string(),
                password: "john".to_string(),
                username: "john".to_string(),
            },
        ])
    }
}

impl AccountRepository for SeedAccounts {
    fn get(&self, id: u64) -> RepositoryResult<Account> {
        self.accounts
            .iter()
            .find(|account| account.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn get_self(&self) -> RepositoryResult<Account> {
        self.get(self.self_id)
    }

    fn query(&self, q: &str) -> RepositoryResult<Account> {
        if q.is_empty() {
            return Err(RepositoryError::InvalidQuery);
        }

        self.accounts
            .iter()
            .find(|account| account.username == q)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}
