// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed, read-only access to the seed data.
//!
//! Each repository is a trait so handlers can be driven by test doubles.
//! The seeded implementations are built once at start-up and never written
//! afterwards, which makes them safe to share across request tasks.

pub mod accounts;
pub mod nodes;

pub use accounts::{AccountRepository, SeedAccounts};
pub use nodes::{NodeRepository, SeedNodes};

/// Errors returned by repository lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No record with the requested id or field value.
    #[error("invalid id")]
    NotFound,

    /// The query string was empty.
    #[error("invalid query")]
    InvalidQuery,

    /// The operation exists in the API but has no implementation.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
