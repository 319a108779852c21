// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! The service reads a YAML document (passed with `--config-file`) and a
//! handful of environment variables.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `METALFLOW_JWT_SECRET` | HMAC secret used to sign bearer tokens | `metalflow` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `metalflow=info,tower_http=debug` |
//!
//! ## Config File
//!
//! ```yaml
//! apiVersion: v1
//! kind: metalflow
//! metadata:
//!   name: metalflow
//! spec:
//!   etcd:
//!     host: 127.0.0.1
//!     port: "2379"
//!   postgres:
//!     host: 127.0.0.1
//!     port: "5432"
//!     user: postgres
//!     pass: postgres
//!     db: metalflow
//! ```

use std::num::ParseIntError;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the token signing secret.
pub const JWT_SECRET_ENV: &str = "METALFLOW_JWT_SECRET";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "metalflow=info,tower_http=debug";

/// Version reported by `--version` and `/config/server/version`.
pub const SERVER_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-build-",
    env!("METALFLOW_BUILD")
);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to unmarshal: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_version: String,
    pub kind: String,
    pub metadata: MetaData,
    #[serde(default)]
    pub spec: Spec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Coordination store endpoint. Parsed and validated, not dialled.
    #[serde(default)]
    pub etcd: Option<EtcdConfig>,
    /// Relational store. Persistence is disabled when absent.
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdConfig {
    pub host: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub pass: String,
    pub db: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: "5432".to_string(),
            user: String::new(),
            pass: String::new(),
            db: "metalflow".to_string(),
        }
    }
}

impl PostgresConfig {
    pub fn port_number(&self) -> Result<u16, ParseIntError> {
        self.port.parse()
    }
}

impl Config {
    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::Invalid("apiVersion is required".into()));
        }
        if self.kind.trim().is_empty() {
            return Err(ConfigError::Invalid("kind is required".into()));
        }
        if self.metadata.name.trim().is_empty() {
            return Err(ConfigError::Invalid("metadata.name is required".into()));
        }
        if let Some(etcd) = &self.spec.etcd {
            if etcd.port.parse::<u16>().is_err() {
                return Err(ConfigError::Invalid(format!(
                    "spec.etcd.port {:?} is not a port number",
                    etcd.port
                )));
            }
        }
        if let Some(postgres) = &self.spec.postgres {
            if postgres.port_number().is_err() {
                return Err(ConfigError::Invalid(format!(
                    "spec.postgres.port {:?} is not a port number",
                    postgres.port
                )));
            }
        }
        Ok(())
    }
}

/// Token signing secret from the environment, if set and non-empty.
pub fn jwt_secret_from_env() -> Option<String> {
    std::env::var(JWT_SECRET_ENV)
        .ok()
        .filter(|secret| !secret.is_empty())
}
