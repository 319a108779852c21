// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stamps the build identifier into the binary.
//!
//! `METALFLOW_BUILD` is read at compile time and exposed to the crate through
//! `env!("METALFLOW_BUILD")`. Local builds without it report `dev`.

fn main() {
    println!("cargo:rerun-if-env-changed=METALFLOW_BUILD");
    let build = std::env::var("METALFLOW_BUILD").unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=METALFLOW_BUILD={build}");
}
