// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PostgreSQL gateway backed by a `sqlx` connection pool.

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;
use tokio::sync::RwLock;
use tracing::info;

use super::record::{Filter, Record, Value, ID_COLUMN};
use crate::config::PostgresConfig;

/// Session time zone requested on every connection.
const TIME_ZONE: &str = "Asia/Shanghai";

/// Upper bound on pooled connections.
const MAX_CONNECTIONS: u32 = 5;

/// How long `open` waits for the first connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("store is not open")]
    NotOpen,

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("unknown column {column:?} for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("failed to open: {0}")]
    Open(#[source] sqlx::Error),

    #[error("failed to migrate: {0}")]
    Migrate(#[source] sqlx::Error),

    #[error("failed to create: {0}")]
    Create(#[source] sqlx::Error),

    #[error("failed to read: {0}")]
    Read(#[source] sqlx::Error),

    #[error("failed to update: {0}")]
    Update(#[source] sqlx::Error),

    #[error("failed to delete: {0}")]
    Delete(#[source] sqlx::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Gateway Trait
// =============================================================================

/// Generic CRUD access to a relational store.
pub trait Gateway: Send + Sync {
    /// Establish the connection.
    fn open(&self) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Release the connection. A no-op when not open.
    fn close(&self) -> impl Future<Output = ()> + Send;

    /// Ensure the table backing `R` exists.
    fn migrate<R: Record>(&self) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Insert a record and return the stored row.
    fn create<R: Record>(&self, record: &R) -> impl Future<Output = GatewayResult<R>> + Send;

    /// First row (by id) matching `filter`.
    fn read<R: Record>(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = GatewayResult<Option<R>>> + Send;

    /// Set one column on every row matching `filter`. Returns the row count.
    fn update<R: Record>(
        &self,
        filter: &Filter,
        column: &str,
        value: Value,
    ) -> impl Future<Output = GatewayResult<u64>> + Send;

    /// Delete every row matching `filter`. Returns the row count.
    fn delete<R: Record>(&self, filter: &Filter) -> impl Future<Output = GatewayResult<u64>> + Send;
}

// =============================================================================
// SQL Builders
// =============================================================================

fn check_column<R: Record>(column: &str) -> GatewayResult<()> {
    if R::has_column(column) {
        Ok(())
    } else {
        Err(GatewayError::UnknownColumn {
            table: R::TABLE,
            column: column.to_string(),
        })
    }
}

pub(crate) fn create_table_sql<R: Record>() -> String {
    let mut definitions = vec![format!("{ID_COLUMN} BIGSERIAL PRIMARY KEY")];
    definitions.extend(
        R::COLUMNS
            .iter()
            .map(|column| format!("{} {}", column.name, column.definition)),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        R::TABLE,
        definitions.join(", ")
    )
}

pub(crate) fn insert_sql<R: Record>() -> String {
    let names: Vec<&str> = R::COLUMNS.iter().map(|column| column.name).collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        R::TABLE,
        names.join(", "),
        placeholders.join(", ")
    )
}

pub(crate) fn select_first_sql<R: Record>(filter_column: &str) -> GatewayResult<String> {
    check_column::<R>(filter_column)?;
    Ok(format!(
        "SELECT * FROM {} WHERE {filter_column} = $1 ORDER BY {ID_COLUMN} LIMIT 1",
        R::TABLE
    ))
}

pub(crate) fn update_sql<R: Record>(column: &str, filter_column: &str) -> GatewayResult<String> {
    check_column::<R>(column)?;
    check_column::<R>(filter_column)?;
    Ok(format!(
        "UPDATE {} SET {column} = $1 WHERE {filter_column} = $2",
        R::TABLE
    ))
}

pub(crate) fn delete_sql<R: Record>(filter_column: &str) -> GatewayResult<String> {
    check_column::<R>(filter_column)?;
    Ok(format!("DELETE FROM {} WHERE {filter_column} = $1", R::TABLE))
}

fn bind_row<'q, R>(
    query: QueryAs<'q, Postgres, R, PgArguments>,
    value: &Value,
) -> QueryAs<'q, Postgres, R, PgArguments> {
    match value {
        Value::Int(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Bool(v) => query.bind(*v),
    }
}

fn bind<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Int(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Bool(v) => query.bind(*v),
    }
}

// =============================================================================
// PgGateway
// =============================================================================

/// Gateway over a PostgreSQL pool.
///
/// The pool is created by [`Gateway::open`] and dropped by
/// [`Gateway::close`]; every other call fails with
/// [`GatewayError::NotOpen`] outside that window.
pub struct PgGateway {
    config: PostgresConfig,
    pool: RwLock<Option<PgPool>>,
}

impl PgGateway {
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    /// Connection options derived from the configuration.
    pub fn connect_options(&self) -> GatewayResult<PgConnectOptions> {
        let port = self
            .config
            .port_number()
            .map_err(|_| GatewayError::InvalidPort(self.config.port.clone()))?;

        Ok(PgConnectOptions::new()
            .host(&self.config.host)
            .port(port)
            .username(&self.config.user)
            .password(&self.config.pass)
            .database(&self.config.db)
            .ssl_mode(PgSslMode::Disable)
            .options([("TimeZone", TIME_ZONE)]))
    }

    pub async fn is_open(&self) -> bool {
        self.pool.read().await.is_some()
    }

    async fn pool(&self) -> GatewayResult<PgPool> {
        self.pool.read().await.clone().ok_or(GatewayError::NotOpen)
    }
}

impl Gateway for PgGateway {
    async fn open(&self) -> GatewayResult<()> {
        let options = self.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(GatewayError::Open)?;

        info!(
            host = %self.config.host,
            port = %self.config.port,
            db = %self.config.db,
            "Relational store opened"
        );

        if let Some(previous) = self.pool.write().await.replace(pool) {
            previous.close().await;
        }
        Ok(())
    }

    async fn close(&self) {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
            info!("Relational store closed");
        }
    }

    async fn migrate<R: Record>(&self) -> GatewayResult<()> {
        let pool = self.pool().await?;
        let sql = create_table_sql::<R>();
        sqlx::query(&sql)
            .execute(&pool)
            .await
            .map_err(GatewayError::Migrate)?;
        info!(table = R::TABLE, "Table migrated");
        Ok(())
    }

    async fn create<R: Record>(&self, record: &R) -> GatewayResult<R> {
        let pool = self.pool().await?;
        let sql = insert_sql::<R>();
        let values = record.values();
        let mut query = sqlx::query_as::<Postgres, R>(&sql);
        for value in &values {
            query = bind_row(query, value);
        }
        query.fetch_one(&pool).await.map_err(GatewayError::Create)
    }

    async fn read<R: Record>(&self, filter: &Filter) -> GatewayResult<Option<R>> {
        let sql = select_first_sql::<R>(&filter.column)?;
        let pool = self.pool().await?;
        bind_row(sqlx::query_as::<Postgres, R>(&sql), &filter.value)
            .fetch_optional(&pool)
            .await
            .map_err(GatewayError::Read)
    }

    async fn update<R: Record>(
        &self,
        filter: &Filter,
        column: &str,
        value: Value,
    ) -> GatewayResult<u64> {
        let sql = update_sql::<R>(column, &filter.column)?;
        let pool = self.pool().await?;
        let query = bind(sqlx::query(&sql), &value);
        let result = bind(query, &filter.value)
            .execute(&pool)
            .await
            .map_err(GatewayError::Update)?;
        Ok(result.rows_affected())
    }

    async fn delete<R: Record>(&self, filter: &Filter) -> GatewayResult<u64> {
        let sql = delete_sql::<R>(&filter.column)?;
        let pool = self.pool().await?;
        let result = bind(sqlx::query(&sql), &filter.value)
            .execute(&pool)
            .await
            .map_err(GatewayError::Delete)?;
        Ok(result.rows_affected())
    }
}
