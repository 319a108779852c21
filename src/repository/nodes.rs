// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node repository backed by the seeded node list.
//!
//! Nodes are read-only: `add` and `delete` are part of the trait so the API
//! can route them, but the seeded repository rejects both.

use super::{RepositoryError, RepositoryResult};
use crate::models::Node;

/// Read access to bare-metal nodes.
pub trait NodeRepository: Send + Sync {
    /// Get a node by id.
    fn get(&self, id: u64) -> RepositoryResult<Node>;

    /// Health status of a node.
    fn health(&self, id: u64) -> RepositoryResult<String> {
        self.get(id).map(|node| node.health)
    }

    /// Hardware info blob of a node.
    fn info(&self, id: u64) -> RepositoryResult<String> {
        self.get(id).map(|node| node.info)
    }

    /// Performance label of a node.
    fn perf(&self, id: u64) -> RepositoryResult<String> {
        self.get(id).map(|node| node.perf)
    }

    /// Find the node whose address equals `q`.
    fn query(&self, q: &str) -> RepositoryResult<Node>;

    /// Register a node.
    fn add(&self, id: u64) -> RepositoryResult<Node>;

    /// Remove a node.
    fn delete(&self, id: u64) -> RepositoryResult<Node>;
}

/// In-memory nodes, scanned linearly.
#[derive(Debug, Clone)]
pub struct SeedNodes {
    nodes: Vec<Node>,
}

impl SeedNodes {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

/// Hardware description stored in the `info` field of seeded nodes.
fn bare_info(ip: &str, mac: &str) -> String {
    format!(
        r#"{{
  "bare": {{
    "cpu": "4 CPU",
    "disk": "49.0 GB (16.0 GB Used)",
    "io": "RD 11887928 KB WR 61067948 KB",
    "ip": "{ip}",
    "kernel": "5.4.0-58-generic",
    "mac": "{mac}",
    "network": "RX packets 8974179 TX packets 3124096",
    "os": "Ubuntu 18.04.5 LTS",
    "ram": "7692 MB (1345 MB Used)",
    "system": ""
  }}
}}"#
    )
}

impl Default for SeedNodes {
    fn default() -> Self {
        Self::new(vec![
            Node {
                address: "127.0.0.1".to_string(),
                asset: "0".to_string(),
                comments: "node 0".to_string(),
                health: "running".to_string(),
                id: 0,
                info: bare_info("127.0.0.1", "00:01:02:03:04:05"),
                perf: "High".to_string(),
                region: "Shanghai".to_string(),
            },
            Node {
                address: "127.0.0.2".to_string(),
                asset: "1".to_string(),
                comments: "node 1".to_string(),
                health: "stop".to_string(),
                id: 1,
                info: bare_info("127.0.0.2", "00:01:02:03:04:06"),
                perf: "Low".to_string(),
                region: "Xian".to_string(),
            },
        ])
    }
}

impl NodeRepository for SeedNodes {
    fn get(&self, id: u64) -> RepositoryResult<Node> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn query(&self, q: &str) -> RepositoryResult<Node> {
        if q.is_empty() {
            return Err(RepositoryError::InvalidQuery);
        }

        self.nodes
            .iter()
            .find(|node| node.address == q)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn add(&self, _id: u64) -> RepositoryResult<Node> {
        Err(RepositoryError::NotImplemented("adding nodes"))
    }

    fn delete(&self, _id: u64) -> RepositoryResult<Node> {
        Err(RepositoryError::NotImplemented("deleting nodes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookups_follow_the_seed() {
        let repo = SeedNodes::default();
        assert_eq!(repo.health(0).unwrap(), "running");
        assert_eq!(repo.health(1).unwrap(), "stop");
        assert_eq!(repo.perf(0).unwrap(), "High");
        assert_eq!(repo.perf(1).unwrap(), "Low");
        assert_eq!(repo.get(1).unwrap().region, "Xian");
    }

    #[test]
    fn info_blob_is_json_text() {
        let info = SeedNodes::default().info(1).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&info).unwrap();
        assert_eq!(parsed["bare"]["ip"], "127.0.0.2");
        assert_eq!(parsed["bare"]["mac"], "00:01:02:03:04:06");
    }

    #[test]
    fn unknown_id_is_not_found_for_every_lookup() {
        let repo = SeedNodes::default();
        assert_eq!(repo.get(7), Err(RepositoryError::NotFound));
        assert_eq!(repo.health(7), Err(RepositoryError::NotFound));
        assert_eq!(repo.info(7), Err(RepositoryError::NotFound));
        assert_eq!(repo.perf(7), Err(RepositoryError::NotFound));
    }

    #[test]
    fn query_matches_address() {
        let repo = SeedNodes::default();
        assert_eq!(repo.query("127.0.0.2").unwrap().id, 1);
        assert_eq!(repo.query("10.0.0.1"), Err(RepositoryError::NotFound));
        assert_eq!(repo.query(""), Err(RepositoryError::InvalidQuery));
    }

    #[test]
    fn mutations_are_rejected() {
        let repo = SeedNodes::default();
        assert!(matches!(
            repo.add(2),
            Err(RepositoryError::NotImplemented(_))
        ));
        assert!(matches!(
            repo.delete(0),
            Err(RepositoryError::NotImplemented(_))
        ));
        // The seed is untouched.
        assert!(repo.get(0).is_ok());
    }
}
