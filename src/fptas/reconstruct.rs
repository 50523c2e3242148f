//! Path reconstruction from a terminal label's predecessor chain.

use crate::graph::Graph;
use crate::model::{NodeId, PathResult};

use super::label::{LabelArena, LabelId};

/// Forward node sequence `[source, ..., target]` of the label `id`.
///
/// Walks predecessors iteratively, collecting edges last-first, then
/// replays them forward. A root label yields just its own node.
pub fn node_sequence(arena: &LabelArena, id: LabelId) -> Vec<NodeId> {
    let mut edges = Vec::new();
    let mut origin = arena.get(id).node;
    for (_, label) in arena.chain(id) {
        match label.edge {
            Some(edge) => edges.push(edge),
            None => origin = label.node,
        }
    }

    let mut path = Vec::with_capacity(edges.len() + 1);
    path.push(edges.last().map_or(origin, |(from, _)| *from));
    for (from, to) in edges.into_iter().rev() {
        if path.last() != Some(&from) {
            path.push(from);
        }
        path.push(to);
    }
    path
}

/// Materialize the result contract for label `id`.
pub fn path_result(graph: &Graph, arena: &LabelArena, id: LabelId, constraint: f64) -> PathResult {
    let label = arena.get(id);
    PathResult {
        path: node_sequence(arena, id)
            .into_iter()
            .map(|n| graph.name(n).to_string())
            .collect(),
        total_reward: label.reward,
        total_penalty: label.penalty,
        constraint_satisfied: label.penalty <= constraint,
    }
}
