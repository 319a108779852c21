// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{token::DEFAULT_SECRET, Authenticator, Authorizer, PrivilegedUser, TokenIssuer};
use crate::repository::{AccountRepository, NodeRepository, SeedAccounts, SeedNodes};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub nodes: Arc<dyn NodeRepository>,
    pub authenticator: Authenticator,
    pub tokens: Arc<TokenIssuer>,
    pub policy: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        nodes: Arc<dyn NodeRepository>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(accounts.clone()),
            accounts,
            nodes,
            tokens: Arc::new(tokens),
            policy: Arc::new(PrivilegedUser::default()),
        }
    }

    pub fn with_policy(mut self, policy: impl Authorizer + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(SeedAccounts::default()),
            Arc::new(SeedNodes::default()),
            TokenIssuer::new(DEFAULT_SECRET.as_bytes()),
        )
    }
}
