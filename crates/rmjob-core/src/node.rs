//! Node requests (what a job asks for) and node info (what it was given).

use serde::{Deserialize, Serialize};

/// A request for a node when submitting a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRequest {
    /// Number of processors usable by the job
    pub procs: Option<u32>,

    /// Properties the node must have
    pub properties: Option<Vec<String>>,
}

impl NodeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procs(mut self, procs: u32) -> Self {
        self.procs = Some(procs);
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }
}

/// One entry of a script's node list: either a specific node by name or a
/// generic request the scheduler fills.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Named(String),
    Request(NodeRequest),
}

impl From<&str> for NodeSpec {
    fn from(name: &str) -> Self {
        NodeSpec::Named(name.to_string())
    }
}

impl From<String> for NodeSpec {
    fn from(name: String) -> Self {
        NodeSpec::Named(name)
    }
}

impl From<NodeRequest> for NodeSpec {
    fn from(request: NodeRequest) -> Self {
        NodeSpec::Request(request)
    }
}

/// A compute node allocated to a job and the processors it holds there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Node host name
    pub name: String,

    /// Processors allocated on this node
    pub procs: u32,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, procs: u32) -> Self {
        Self {
            name: name.into(),
            procs,
        }
    }
}
