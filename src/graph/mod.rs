//! # Graph Model
//!
//! Immutable directed-edge store with per-edge (reward, penalty) attributes.
//!
//! `GraphBuilder` interns opaque node names into dense `NodeId`s and keeps one
//! cost per `(src, dst)` pair: adding the same edge again overwrites it.
//! `build()` freezes everything into compressed adjacency (outgoing and
//! incoming) that the engine reads without locks.
//!
//! ## Ordering
//!
//! Node ids follow first-seen order. Edges keep the order in which each
//! `(src, dst)` pair was first added; the engine iterates in this order, so
//! results are deterministic for a given input.

pub mod loader;
pub mod generate;

use hashbrown::HashMap;

use crate::model::*;
use crate::{Error, Result};

// ============================================================================
// GraphBuilder
// ============================================================================

/// Mutable staging area for a `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    names: Vec<String>,
    index: HashMap<String, NodeId>,
    edges: Vec<Edge>,
    /// (src, dst) → position in `edges`
    edge_index: HashMap<(NodeId, NodeId), usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node, returning its id. Idempotent.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Add or overwrite the edge `src -> dst`. Both nodes must already exist.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, cost: EdgeCost) -> Result<()> {
        let src_name = self.names.get(src.index())
            .ok_or_else(|| Error::UnknownNode(format!("#{src}")))?;
        let dst_name = self.names.get(dst.index())
            .ok_or_else(|| Error::UnknownNode(format!("#{dst}")))?;

        if !cost.is_valid() {
            return Err(Error::InvalidCost {
                src: src_name.clone(),
                dst: dst_name.clone(),
                message: format!(
                    "reward and penalty must be finite and >= 0, got ({}, {})",
                    cost.reward, cost.penalty,
                ),
            });
        }

        match self.edge_index.get(&(src, dst)) {
            Some(&pos) => self.edges[pos].cost = cost,
            None => {
                self.edge_index.insert((src, dst), self.edges.len());
                self.edges.push(Edge::new(src, dst, cost));
            }
        }
        Ok(())
    }

    /// Add or overwrite an edge by node name, declaring missing nodes.
    pub fn connect(&mut self, src: &str, dst: &str, cost: EdgeCost) -> Result<()> {
        let s = self.add_node(src);
        let d = self.add_node(dst);
        self.add_edge(s, d, cost)
    }

    pub fn has_edge(&self, src: NodeId, dst: NodeId) -> bool {
        self.edge_index.contains_key(&(src, dst))
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freeze into an immutable `Graph`.
    pub fn build(self) -> Graph {
        let n = self.names.len();
        let (out_offsets, outgoing) = compress(n, &self.edges, |e| e.src);
        let (in_offsets, incoming) = compress(n, &self.edges, |e| e.dst);

        let mut max_cost = EdgeCost::ZERO;
        for e in &self.edges {
            max_cost.reward = max_cost.reward.max(e.cost.reward);
            max_cost.penalty = max_cost.penalty.max(e.cost.penalty);
        }

        Graph {
            names: self.names,
            index: self.index,
            out_offsets,
            outgoing,
            in_offsets,
            incoming,
            max_cost,
        }
    }
}

/// Stable counting sort of `edges` by `key`, yielding CSR offsets.
fn compress(n: usize, edges: &[Edge], key: impl Fn(&Edge) -> NodeId) -> (Vec<usize>, Vec<Edge>) {
    let mut offsets = vec![0usize; n + 1];
    for e in edges {
        offsets[key(e).index() + 1] += 1;
    }
    for i in 0..n {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut sorted = vec![Edge::new(NodeId(0), NodeId(0), EdgeCost::ZERO); edges.len()];
    for e in edges {
        let slot = &mut cursor[key(e).index()];
        sorted[*slot] = *e;
        *slot += 1;
    }
    (offsets, sorted)
}

// ============================================================================
// Graph
// ============================================================================

/// Read-only directed graph. Freely shared across threads.
#[derive(Debug, Clone)]
pub struct Graph {
    names: Vec<String>,
    index: HashMap<String, NodeId>,
    out_offsets: Vec<usize>,
    outgoing: Vec<Edge>,
    in_offsets: Vec<usize>,
    incoming: Vec<Edge>,
    /// Component-wise maximum over all edges.
    max_cost: EdgeCost,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len() as u32).map(NodeId)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.names[id.index()]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Resolve a name, failing with `UnknownNode`.
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        self.node_id(name).ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    pub fn outgoing_edges(&self, node: NodeId) -> &[Edge] {
        let i = node.index();
        &self.outgoing[self.out_offsets[i]..self.out_offsets[i + 1]]
    }

    pub fn incoming_edges(&self, node: NodeId) -> &[Edge] {
        let i = node.index();
        &self.incoming[self.in_offsets[i]..self.in_offsets[i + 1]]
    }

    /// All edges, grouped by source.
    pub fn edges(&self) -> &[Edge] {
        &self.outgoing
    }

    pub fn edge_cost(&self, src: NodeId, dst: NodeId) -> Option<EdgeCost> {
        self.outgoing_edges(src).iter().find(|e| e.dst == dst).map(|e| e.cost)
    }

    /// Cost of a named edge, used when re-summing a reconstructed path.
    pub fn edge_cost_by_name(&self, src: &str, dst: &str) -> Option<EdgeCost> {
        self.edge_cost(self.node_id(src)?, self.node_id(dst)?)
    }

    pub fn max_edge_reward(&self) -> f64 {
        self.max_cost.reward
    }

    pub fn max_edge_penalty(&self) -> f64 {
        self.max_cost.penalty
    }

    /// Nodes ordered by index suffix (`n0, n1, …, n10`), falling back to
    /// lexicographic order for names without one.
    pub fn ordered_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes().collect();
        ids.sort_by(|a, b| {
            let (na, nb) = (self.name(*a), self.name(*b));
            match (index_suffix(na), index_suffix(nb)) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| na.cmp(nb)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => na.cmp(nb),
            }
        });
        ids
    }

    /// Default `(source, target)`: first and last node in suffix order.
    pub fn default_endpoints(&self) -> Result<(NodeId, NodeId)> {
        let ordered = self.ordered_nodes();
        match (ordered.first(), ordered.last()) {
            (Some(&s), Some(&t)) => Ok((s, t)),
            _ => Err(Error::EmptyGraph),
        }
    }

    /// Sum of edge costs along a named node sequence, or `None` if a step is
    /// not an edge.
    pub fn path_cost(&self, path: &[String]) -> Option<EdgeCost> {
        path.windows(2).try_fold(EdgeCost::ZERO, |acc, w| {
            Some(acc + self.edge_cost_by_name(&w[0], &w[1])?)
        })
    }
}

/// Trailing decimal digits of a name, e.g. `n42` → 42.
fn index_suffix(name: &str) -> Option<u64> {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    name[name.len() - digits..].parse().ok()
}

// ============================================================================
// Tests
// ============================================================================
