// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use clap::Parser;
use metalflow::{
    cmd::{self, Args},
    logging::{init_tracing, LogFormat},
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(LogFormat::from_env());

    match cmd::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "metalflow failed");
            ExitCode::FAILURE
        }
    }
}
