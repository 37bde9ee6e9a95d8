// Deadlock Detection
//
// A cycle in the resource allocation graph is only a necessary condition for
// deadlock once resources carry more than one unit. A reported cycle means "may be
// deadlocked", exact only for single-instance resources.
use super::graph::ResourceAllocationGraph;
use super::types::*;
use crate::state::ResourceState;
use std::collections::HashSet;
use tracing::debug;

pub struct AllocationGraphAnalyzer;

impl AllocationGraphAnalyzer {
    /// Build a fresh graph from `state` and search it for a cycle.
    pub fn detect_deadlock(state: &ResourceState) -> Option<Cycle> {
        let graph = ResourceAllocationGraph::from_state(state);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built resource allocation graph"
        );
        Self::find_cycle(&graph)
    }

    /// Depth-first search from each unvisited node in graph order; returns the first
    /// cycle closed by a back edge.
    pub fn find_cycle(graph: &ResourceAllocationGraph) -> Option<Cycle> {
        let mut visited = HashSet::new();

        for &start in graph.nodes() {
            if visited.contains(&start) {
                continue;
            }

            if let Some(cycle) = Self::dfs(start, graph, &mut visited) {
                return Some(cycle);
            }
        }

        None
    }

    // Explicit stack: path depth is bounded by the graph size, not the thread stack.
    // `cursors[i]` is the next successor of `rec_stack[i]` to explore.
    fn dfs(
        start: NodeId,
        graph: &ResourceAllocationGraph,
        visited: &mut HashSet<NodeId>,
    ) -> Option<Cycle> {
        let mut rec_stack = vec![start];
        let mut cursors = vec![0usize];
        let mut on_stack = HashSet::from([start]);
        visited.insert(start);

        while let Some(&node) = rec_stack.last() {
            let cursor = cursors.last_mut()?;

            match graph.successors(node).get(*cursor) {
                Some(&neighbor) => {
                    *cursor += 1;

                    if on_stack.contains(&neighbor) {
                        // Back edge: the cycle runs from `neighbor`'s stack position to `node`
                        let pos = rec_stack.iter().position(|&n| n == neighbor)?;
                        return Some(Cycle::from_path(&rec_stack[pos..], neighbor));
                    }
                    if visited.insert(neighbor) {
                        rec_stack.push(neighbor);
                        cursors.push(0);
                        on_stack.insert(neighbor);
                    }
                }
                None => {
                    rec_stack.pop();
                    cursors.pop();
                    on_stack.remove(&node);
                }
            }
        }

        None
    }
}
