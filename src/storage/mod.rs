// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistence Gateway
//!
//! All access to the relational store goes through the [`Gateway`] trait.
//! The PostgreSQL implementation ([`PgGateway`]) is a thin pass-through:
//! every call is a single statement, there are no retries and no
//! transactions spanning calls.
//!
//! Records are typed. Anything implementing [`Record`] can be migrated,
//! created, read, updated and deleted. Column names supplied at runtime are
//! checked against the record schema before SQL is built.

pub mod postgres;
pub mod record;

pub use postgres::{Gateway, GatewayError, GatewayResult, PgGateway};
pub use record::{Column, Filter, NodeRecord, Record, Value};
