// Resource Allocation Graph
use super::types::*;
use crate::state::ResourceState;
use std::collections::{BTreeSet, HashMap};

/// Directed process/resource graph derived from a `ResourceState`.
///
/// Rebuilt from scratch for every analysis. Nodes are all processes in index order
/// followed by all resources in index order; each node's successors are kept in the
/// order their edges were added, so traversal is deterministic.
#[derive(Debug, Clone)]
pub struct ResourceAllocationGraph {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
}

impl ResourceAllocationGraph {
    pub fn from_state(state: &ResourceState) -> Self {
        let nodes: Vec<NodeId> = (0..state.num_processes())
            .map(NodeId::Process)
            .chain((0..state.num_resources()).map(NodeId::Resource))
            .collect();

        let mut graph = ResourceAllocationGraph {
            adjacency: nodes.iter().map(|&n| (n, Vec::new())).collect(),
            nodes,
            edges: Vec::new(),
        };

        for p in 0..state.num_processes() {
            for r in 0..state.num_resources() {
                if state.allocation()[p][r] > 0 {
                    graph.add_edge(NodeId::Resource(r), NodeId::Process(p));
                }
                if state.need(p, r) > 0 {
                    graph.add_edge(NodeId::Process(p), NodeId::Resource(r));
                }
            }
        }

        graph
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push(Edge::new(from, to));
        self.adjacency.entry(from).or_default().push(to);
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.kind() == kind)
    }

    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.successors(from).contains(&to)
    }

    /// Order-insensitive view of the edge set, for comparing two builds.
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        self.edges.iter().copied().collect()
    }
}
