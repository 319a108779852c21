// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Metal Flow - bare-metal node inventory service
//!
//! A small HTTP API over operator accounts and bare-metal nodes, guarded by
//! bearer tokens, with an optional PostgreSQL store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers, middleware stack and OpenAPI docs (Axum)
//! - `auth` - Login, token issuance and validation, admin authorization
//! - `cmd` - Command line flags and the start-up sequence
//! - `repository` - Seeded account and node lookups
//! - `server` - Listener binding and graceful shutdown
//! - `storage` - PostgreSQL gateway over typed records

pub mod api;
pub mod auth;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod server;
pub mod state;
pub mod storage;
