//! Random graph generation for experiments and tests.
//!
//! Nodes are named `n0 … n{k}` so the default endpoints are `n0` and the
//! highest index. No self loops, no duplicate `(u, v)` pairs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::EdgeCost;
use super::{Graph, GraphBuilder};

/// How edge attributes are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostDistribution {
    /// Independent integer reward and penalty, each in `0..=max`.
    RewardPenalty { max_reward: u32, max_penalty: u32 },
    /// One integer weight in `-range..=range`, split by sign.
    SignedWeight { range: u32 },
}

impl Default for CostDistribution {
    fn default() -> Self {
        CostDistribution::RewardPenalty { max_reward: 10, max_penalty: 10 }
    }
}

/// Shape of a random graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomGraphConfig {
    pub nodes: usize,
    /// Requested edge count, capped at `nodes * (nodes - 1)`.
    pub edges: usize,
    /// Only emit `u -> v` with `u < v`, producing a DAG.
    #[serde(default)]
    pub acyclic: bool,
    #[serde(default)]
    pub costs: CostDistribution,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        Self { nodes: 20, edges: 100, acyclic: false, costs: CostDistribution::default() }
    }
}

impl RandomGraphConfig {
    fn max_edges(&self) -> usize {
        let n = self.nodes;
        let full = n.saturating_mul(n.saturating_sub(1));
        if self.acyclic { full / 2 } else { full }
    }
}

/// Generate a graph. All nodes are declared even if they end up isolated.
pub fn random_graph<R: Rng + ?Sized>(config: &RandomGraphConfig, rng: &mut R) -> Graph {
    let mut builder = GraphBuilder::new();
    let ids: Vec<_> = (0..config.nodes).map(|i| builder.add_node(&format!("n{i}"))).collect();

    let target = config.edges.min(config.max_edges());
    while builder.edge_count() < target {
        let mut u = rng.gen_range(0..config.nodes);
        let mut v = rng.gen_range(0..config.nodes);
        if u == v {
            continue;
        }
        if config.acyclic && u > v {
            std::mem::swap(&mut u, &mut v);
        }
        if builder.has_edge(ids[u], ids[v]) {
            continue;
        }
        let cost = draw_cost(&config.costs, rng);
        // ids come from this builder and costs are non-negative
        if builder.add_edge(ids[u], ids[v], cost).is_err() {
            break;
        }
    }

    tracing::debug!(nodes = config.nodes, edges = builder.edge_count(), "random graph generated");
    builder.build()
}

fn draw_cost<R: Rng + ?Sized>(dist: &CostDistribution, rng: &mut R) -> EdgeCost {
    match *dist {
        CostDistribution::RewardPenalty { max_reward, max_penalty } => EdgeCost::new(
            rng.gen_range(0..=max_reward) as f64,
            rng.gen_range(0..=max_penalty) as f64,
        ),
        CostDistribution::SignedWeight { range } => {
            let r = range as i64;
            EdgeCost::from_signed_weight(rng.gen_range(-r..=r) as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_edge_count_and_no_self_loops() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = random_graph(&RandomGraphConfig { nodes: 8, edges: 20, ..Default::default() }, &mut rng);
        assert_eq!(g.node_count(), 8);
        assert_eq!(g.edge_count(), 20);
        assert!(g.edges().iter().all(|e| e.src != e.dst));
    }

    #[test]
    fn test_edge_count_capped() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = random_graph(&RandomGraphConfig { nodes: 3, edges: 50, ..Default::default() }, &mut rng);
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn test_acyclic_edges_point_forward() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = RandomGraphConfig { nodes: 10, edges: 30, acyclic: true, ..Default::default() };
        let g = random_graph(&config, &mut rng);
        assert!(g.edges().iter().all(|e| e.src < e.dst));
    }

    #[test]
    fn test_signed_weights_split() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = RandomGraphConfig {
            nodes: 6,
            edges: 15,
            costs: CostDistribution::SignedWeight { range: 10 },
            ..Default::default()
        };
        let g = random_graph(&config, &mut rng);
        assert!(g.edges().iter().all(|e| e.cost.reward == 0.0 || e.cost.penalty == 0.0));
    }
}
