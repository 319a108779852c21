// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command line entry point: flags, start-up sequence and shutdown.

use std::{net::AddrParseError, path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::info;

use crate::{
    api::{api_docs, router_with_docs},
    auth::{token::DEFAULT_SECRET, TokenIssuer},
    config::{jwt_secret_from_env, Config, ConfigError, SERVER_VERSION},
    repository::{SeedAccounts, SeedNodes},
    server::{bind, parse_listen_url, serve, shutdown_signal, ServerError},
    state::AppState,
    storage::{Gateway, GatewayError, NodeRecord, PgGateway},
};

/// Listen address used when `--listen-url` is not given.
pub const DEFAULT_LISTEN_URL: &str = ":9080";

/// Metal Flow
#[derive(Debug, Parser)]
#[command(name = "metalflow", version = SERVER_VERSION, about = "Metal Flow")]
pub struct Args {
    /// Config file (.yml)
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: PathBuf,

    /// Listen url, `:port` listens on all interfaces
    #[arg(long = "listen-url", value_name = "ADDR", default_value = DEFAULT_LISTEN_URL)]
    pub listen_url: String,
}

/// Failures that stop the service from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to init config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to init doc: invalid listen url {url:?}: {source}")]
    ListenUrl {
        url: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to init postgres: {0}")]
    Store(#[from] GatewayError),

    #[error("failed to run flow: {0}")]
    Server(#[from] ServerError),
}

/// Load config, prepare docs and storage, then serve until a shutdown signal.
pub async fn run(args: Args) -> Result<(), StartupError> {
    let config = Config::load(&args.config_file)?;
    info!(
        path = %args.config_file.display(),
        name = %config.metadata.name,
        "Config loaded"
    );

    let addr = parse_listen_url(&args.listen_url).map_err(|source| StartupError::ListenUrl {
        url: args.listen_url.clone(),
        source,
    })?;
    let docs = api_docs(addr);

    let store = match &config.spec.postgres {
        Some(postgres) => {
            let gateway = PgGateway::new(postgres.clone());
            init_store(&gateway).await?;
            Some(gateway)
        }
        None => {
            info!("No postgres configured, running on seed data only");
            None
        }
    };

    let app = router_with_docs(app_state(), docs);
    let served = async {
        let listener = bind(addr).await?;
        info!(%addr, version = SERVER_VERSION, "flow running");
        serve(listener, app, shutdown_signal()).await
    }
    .await;

    if let Some(store) = store {
        store.close().await;
    }
    served?;

    info!("flow exiting");
    Ok(())
}

/// Open the gateway and migrate the node table.
///
/// The gateway is closed again if migration fails.
pub async fn init_store<G: Gateway>(gateway: &G) -> Result<(), GatewayError> {
    gateway.open().await?;
    if let Err(e) = gateway.migrate::<NodeRecord>().await {
        gateway.close().await;
        return Err(e);
    }
    Ok(())
}

/// Seed repositories with the signing secret from the environment.
fn app_state() -> AppState {
    let secret = jwt_secret_from_env().unwrap_or_else(|| DEFAULT_SECRET.to_string());
    AppState::new(
        Arc::new(SeedAccounts::default()),
        Arc::new(SeedNodes::default()),
        TokenIssuer::new(secret.as_bytes()),
    )
}
