//! GraphIndex - validated topology view over a caller's node/edge lists.
//!
//! The caller owns nodes and edges as plain vectors. Every algorithm that
//! needs adjacency goes through a `GraphIndex`, which maps stable `NodeId`s
//! to slots (positions in the node slice) and stores the topology in a
//! petgraph StableGraph. Building the index is where dangling edges are
//! rejected, so no algorithm downstream ever sees a corrupt degree count.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use std::collections::HashMap;

use super::edge::Edge;
use super::node::{Node, NodeId};
use crate::error::{LayoutError, Result};

/// Topology of one graph snapshot, addressed by node slot.
pub struct GraphIndex {
    /// Node weights are slots into the original node slice.
    graph: StableGraph<usize, (), Directed>,

    /// Map from stable NodeId to petgraph NodeIndex
    id_to_index: HashMap<NodeId, NodeIndex>,

    /// Slot to petgraph index (dense, same length as the node slice)
    slot_to_index: Vec<NodeIndex>,

    /// Outgoing neighbor slots per slot, in edge declaration order
    outgoing: Vec<Vec<usize>>,
}

impl GraphIndex {
    /// Index a node/edge snapshot.
    ///
    /// Fails with [`LayoutError::DanglingEdge`] if any edge references a
    /// node that is not in `nodes`. Duplicate node ids keep their first slot.
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Result<Self> {
        let mut graph = StableGraph::with_capacity(nodes.len(), edges.len());
        let mut id_to_index = HashMap::with_capacity(nodes.len());
        let mut slot_to_index = Vec::with_capacity(nodes.len());

        for (slot, node) in nodes.iter().enumerate() {
            let index = graph.add_node(slot);
            id_to_index.entry(node.id.clone()).or_insert(index);
            slot_to_index.push(index);
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        for edge in edges {
            let source = *id_to_index.get(&edge.source).ok_or_else(|| LayoutError::DanglingEdge {
                edge: edge.id.clone(),
                node: edge.source.clone(),
            })?;
            let target = *id_to_index.get(&edge.target).ok_or_else(|| LayoutError::DanglingEdge {
                edge: edge.id.clone(),
                node: edge.target.clone(),
            })?;

            graph.add_edge(source, target, ());
            outgoing[graph[source]].push(graph[target]);
        }

        Ok(Self {
            graph,
            id_to_index,
            slot_to_index,
            outgoing,
        })
    }

    /// Number of indexed nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.slot_to_index.len()
    }

    /// Number of indexed edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Slot of a node id, if present.
    pub fn slot(&self, id: &NodeId) -> Option<usize> {
        self.id_to_index.get(id).map(|&index| self.graph[index])
    }

    /// Outgoing neighbor slots in edge declaration order.
    #[inline]
    pub fn successors(&self, slot: usize) -> &[usize] {
        &self.outgoing[slot]
    }

    /// Neighbor slots ignoring edge direction, deduplicated, excluding `slot` itself.
    pub fn undirected_neighbors(&self, slot: usize) -> Vec<usize> {
        let index = self.slot_to_index[slot];
        let mut neighbors: Vec<usize> = self
            .graph
            .neighbors_undirected(index)
            .map(|n| self.graph[n])
            .filter(|&n| n != slot)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Number of incoming edges.
    pub fn in_degree(&self, slot: usize) -> usize {
        self.graph
            .neighbors_directed(self.slot_to_index[slot], Direction::Incoming)
            .count()
    }

    /// Whether an edge joins `a` and `b` in either direction.
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        let (ia, ib) = (self.slot_to_index[a], self.slot_to_index[b]);
        self.graph.contains_edge(ia, ib) || self.graph.contains_edge(ib, ia)
    }

    /// All edges as `(source_slot, target_slot)` pairs.
    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()]))
            .collect()
    }
}
