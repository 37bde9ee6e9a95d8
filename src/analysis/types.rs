// Resource Allocation Graph Types
use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Process,
    Resource,
}

/// Graph node identity: a process or a resource type by index.
///
/// Ordering puts every process before every resource, which is the order the cycle
/// search visits start nodes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Process(usize),
    Resource(usize),
}

impl NodeId {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeId::Process(_) => NodeKind::Process,
            NodeId::Resource(_) => NodeKind::Resource,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            NodeId::Process(i) | NodeId::Resource(i) => *i,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Process(i) => write!(f, "P{}", i),
            NodeId::Resource(i) => write!(f, "R{}", i),
        }
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNodeId(s.to_string());
        let mut chars = s.chars();
        let tag = chars.next().ok_or_else(invalid)?;
        let index: usize = chars.as_str().parse().map_err(|_| invalid())?;

        match tag {
            'P' => Ok(NodeId::Process(index)),
            'R' => Ok(NodeId::Resource(index)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `R -> P`: the resource is held by the process
    Assignment,
    /// `P -> R`: the process may still request the resource
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Edge { from, to }
    }

    /// Edge direction determines its kind; process and resource nodes alternate.
    pub fn kind(&self) -> EdgeKind {
        match self.from {
            NodeId::Resource(_) => EdgeKind::Assignment,
            NodeId::Process(_) => EdgeKind::Request,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A directed cycle as the ordered edges that close it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(Vec<Edge>);

impl Cycle {
    pub(crate) fn from_path(path: &[NodeId], closing: NodeId) -> Self {
        let mut edges: Vec<Edge> = path.windows(2).map(|w| Edge::new(w[0], w[1])).collect();
        if let Some(&last) = path.last() {
            edges.push(Edge::new(last, closing));
        }
        Cycle(edges)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nodes on the cycle in traversal order, without repeating the start.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().map(|e| e.from)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes = self.nodes();
        match nodes.next() {
            Some(first) => {
                write!(f, "{}", first)?;
                for node in nodes {
                    write!(f, " -> {}", node)?;
                }
                write!(f, " -> {}", first)
            }
            None => Ok(()),
        }
    }
}
