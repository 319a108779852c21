// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record shapes exchanged with the relational store.

use sqlx::postgres::PgRow;
use sqlx::FromRow;

use crate::models::Node;

/// Name of the generated primary key present on every table.
pub const ID_COLUMN: &str = "id";

/// A column of a record table, excluding the generated `id` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// SQL type and constraints, e.g. `TEXT NOT NULL UNIQUE`.
    pub definition: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, definition: &'static str) -> Self {
        Self { name, definition }
    }
}

/// A scalar bound into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Equality condition on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// A typed row stored in its own table.
///
/// The table always carries a `BIGSERIAL` primary key named `id`, decoded by
/// the `FromRow` implementation but never written by [`Record::values`].
pub trait Record: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static {
    /// Table name.
    const TABLE: &'static str;

    /// Writable columns in insert order.
    const COLUMNS: &'static [Column];

    /// Values for [`Record::COLUMNS`], in the same order.
    fn values(&self) -> Vec<Value>;

    /// Whether `name` is a column of this record (including `id`).
    fn has_column(name: &str) -> bool {
        name == ID_COLUMN || Self::COLUMNS.iter().any(|column| column.name == name)
    }
}

/// Persisted form of a [`Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct NodeRecord {
    pub id: i64,
    pub address: String,
    pub asset: String,
    pub comments: String,
    pub health: String,
    pub info: String,
    pub perf: String,
    pub region: String,
}

impl Record for NodeRecord {
    const TABLE: &'static str = "nodes";

    const COLUMNS: &'static [Column] = &[
        Column::new("address", "TEXT NOT NULL UNIQUE"),
        Column::new("asset", "TEXT NOT NULL UNIQUE"),
        Column::new("comments", "TEXT NOT NULL DEFAULT ''"),
        Column::new("health", "TEXT NOT NULL DEFAULT ''"),
        Column::new("info", "TEXT NOT NULL DEFAULT ''"),
        Column::new("perf", "TEXT NOT NULL DEFAULT ''"),
        Column::new("region", "TEXT NOT NULL DEFAULT ''"),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            self.address.as_str().into(),
            self.asset.as_str().into(),
            self.comments.as_str().into(),
            self.health.as_str().into(),
            self.info.as_str().into(),
            self.perf.as_str().into(),
            self.region.as_str().into(),
        ]
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: 0,
            address: node.address.clone(),
            asset: node.asset.clone(),
            comments: node.comments.clone(),
            health: node.health.clone(),
            info: node.info.clone(),
            perf: node.perf.clone(),
            region: node.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_record_values_follow_column_order() {
        let record = NodeRecord {
            address: "127.0.0.1".into(),
            asset: "0".into(),
            region: "Shanghai".into(),
            ..Default::default()
        };
        let values = record.values();
        assert_eq!(values.len(), NodeRecord::COLUMNS.len());
        assert_eq!(values[0], Value::Text("127.0.0.1".into()));
        assert_eq!(values[1], Value::Text("0".into()));
        assert_eq!(values[6], Value::Text("Shanghai".into()));
    }

    #[test]
    fn node_conversion_leaves_id_to_the_store() {
        let node = Node {
            id: 7,
            address: "127.0.0.2".into(),
            health: "stop".into(),
            ..Default::default()
        };
        let record = NodeRecord::from(&node);
        assert_eq!(record.id, 0);
        assert_eq!(record.address, "127.0.0.2");
        assert_eq!(record.health, "stop");
    }

    #[test]
    fn has_column_includes_primary_key() {
        assert!(NodeRecord::has_column("id"));
        assert!(NodeRecord::has_column("address"));
        assert!(!NodeRecord::has_column("Address"));
        assert!(!NodeRecord::has_column("address; DROP TABLE nodes"));
    }
}
