//! Cluster descriptor: where the batch server lives and how to reach it.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connection parameters for a resource manager server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMgrServer {
    /// Batch server host name
    pub host: String,

    /// Directory holding the batch client library
    #[serde(default)]
    pub lib: Option<Utf8PathBuf>,

    /// Directory holding the batch client commands (qsub, qstat, ...)
    #[serde(default)]
    pub bin: Option<Utf8PathBuf>,

    /// Resource manager version
    #[serde(default)]
    pub version: Option<String>,
}

impl ResourceMgrServer {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            lib: None,
            bin: None,
            version: None,
        }
    }
}

/// A cluster jobs are submitted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier
    pub id: String,

    /// The resource manager server of this cluster
    pub resource_mgr_server: ResourceMgrServer,
}

impl Cluster {
    pub fn new(id: impl Into<String>, resource_mgr_server: ResourceMgrServer) -> Self {
        Self {
            id: id.into(),
            resource_mgr_server,
        }
    }

    /// Parse a cluster descriptor from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ClusterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a cluster descriptor from a JSON file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ClusterError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OAKLEY: &str = r#"{
        "id": "oakley",
        "resource_mgr_server": {
            "host": "oak-batch.osc.edu",
            "lib": "/opt/torque/lib64",
            "bin": "/opt/torque/bin",
            "version": "6.0.1"
        }
    }"#;

    #[test]
    fn test_from_json_str() {
        let cluster = Cluster::from_json_str(OAKLEY).unwrap();
        assert_eq!(cluster.id, "oakley");
        assert_eq!(cluster.resource_mgr_server.host, "oak-batch.osc.edu");
        assert_eq!(
            cluster.resource_mgr_server.bin.as_deref(),
            Some(Utf8Path::new("/opt/torque/bin"))
        );
        assert_eq!(cluster.resource_mgr_server.version.as_deref(), Some("6.0.1"));
    }

    #[test]
    fn test_optional_locations() {
        let cluster =
            Cluster::from_json_str(r#"{"id": "c", "resource_mgr_server": {"host": "h"}}"#)
                .unwrap();
        assert_eq!(cluster, Cluster::new("c", ResourceMgrServer::new("h")));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OAKLEY.as_bytes()).unwrap();
        let path = Utf8Path::from_path(file.path()).unwrap();

        let cluster = Cluster::from_json_file(path).unwrap();
        assert_eq!(cluster.id, "oakley");
    }

    #[test]
    fn test_from_json_file_errors() {
        let missing = Cluster::from_json_file(Utf8Path::new("/nonexistent/cluster.json"));
        assert!(matches!(missing, Err(ClusterError::Io(_))));

        let invalid = Cluster::from_json_str("{\"id\": 1}");
        assert!(matches!(invalid, Err(ClusterError::Json(_))));
    }
}
