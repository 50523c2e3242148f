//! # FPTAS engine
//!
//! ```text
//! Init ──▶ Relaxation (rounds 1..n−1) ──▶ Selection ──▶ Reconstruction ──▶ Done
//!  │              │                           │
//!  └─ UnknownNode └─ BudgetExceeded           └─ Infeasible
//! ```
//!
//! `Init` resolves endpoints and sizes the bucket space; a malformed request
//! fails here with an `Error` before any label exists. Everything after that
//! ends in a typed `Outcome`.
//!
//! All state is passed explicitly: the graph and parameters live in a
//! `SearchContext`, labels in a `LabelArena`, and the frontier is returned
//! by the variant that built it. Nothing is global, so concurrent solves on
//! the same `Graph` are independent.

pub mod bucket;
pub mod label;
pub mod frontier;
pub mod layered;
pub mod worklist;
pub mod select;
pub mod reconstruct;

use std::time::Instant;

use crate::config::{Budget, SolverConfig, Variant};
use crate::graph::Graph;
use crate::model::*;
use crate::Result;

use bucket::{BucketKey, Bucketer, RewardBucketing};
use frontier::Frontier;
use label::{Label, LabelArena, LabelId, PendingLabel};

/// Relative slack on the path-total upper bounds, absorbing float rounding
/// in sums of up to n−1 edge values.
const BOUND_SLACK: f64 = 1e-9;

// ============================================================================
// SearchContext
// ============================================================================

/// Read-only inputs shared by every relaxation.
#[derive(Debug, Clone)]
pub struct SearchContext<'g> {
    pub graph: &'g Graph,
    pub source: NodeId,
    pub target: NodeId,
    pub bucketer: Bucketer,
    /// Penalty bound C, `+∞` when unconstrained.
    pub constraint: f64,
    /// `Wx`: max edge reward × (n − 1).
    pub max_reward: f64,
    /// `Wy`: max edge penalty × (n − 1).
    pub max_penalty: f64,
    /// A simple path has at most n − 1 edges.
    pub max_hops: u32,
}

impl<'g> SearchContext<'g> {
    pub fn new(graph: &'g Graph, config: &SolverConfig, source: NodeId, target: NodeId) -> Self {
        let n = graph.node_count();
        let hops = n.saturating_sub(1);
        let max_reward = graph.max_edge_reward() * hops as f64;
        let max_penalty = graph.max_edge_penalty() * hops as f64;

        Self {
            graph,
            source,
            target,
            bucketer: Bucketer::new(config.scheme, config.epsilon, n, max_reward),
            constraint: config.constraint_or_inf(),
            max_reward,
            max_penalty,
            max_hops: hops as u32,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn root(&self) -> (BucketKey, Label) {
        (self.bucketer.bucket(0.0), Label::root(self.source, self.node_count()))
    }

    /// Extend `label` (stored as `pred`) along `edge`, or `None` if the step
    /// revisits a node, breaks the constraint, or leaves the bounded space.
    pub fn extend(&self, label: &Label, pred: LabelId, edge: &Edge) -> Option<(BucketKey, PendingLabel)> {
        debug_assert_eq!(label.node, edge.src);
        if label.visited.contains(edge.dst) {
            return None;
        }

        let reward = label.reward + edge.cost.reward;
        let penalty = label.penalty + edge.cost.penalty;
        if penalty > self.constraint
            || reward > self.max_reward * (1.0 + BOUND_SLACK)
            || penalty > self.max_penalty * (1.0 + BOUND_SLACK)
        {
            return None;
        }

        let pending = PendingLabel {
            reward,
            penalty,
            pred,
            edge: (edge.src, edge.dst),
            hops: label.hops + 1,
            visited: label.visited.extended(edge.dst),
        };
        Some((self.bucketer.bucket(reward), pending))
    }
}

// ============================================================================
// Budget tracking
// ============================================================================

/// Counts expansions against the caller's `Budget`.
#[derive(Debug)]
pub struct BudgetTracker {
    budget: Budget,
    started: Instant,
    expansions: u64,
}

impl BudgetTracker {
    pub fn new(budget: Budget) -> Self {
        Self { budget, started: Instant::now(), expansions: 0 }
    }

    pub fn record(&mut self, expansions: u64) {
        self.expansions += expansions;
    }

    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// True once either limit has been reached; no further work may start.
    pub fn exhausted(&self) -> bool {
        if self.budget.max_expansions.is_some_and(|max| self.expansions >= max) {
            return true;
        }
        self.budget.max_duration().is_some_and(|limit| self.started.elapsed() >= limit)
    }
}

/// What a relaxation variant hands back to `solve`.
#[derive(Debug)]
pub struct RelaxationRun {
    pub frontier: Frontier,
    /// Layered: rounds completed. Worklist: node dequeues.
    pub rounds: usize,
    pub exhausted: bool,
}

// ============================================================================
// solve
// ============================================================================

/// Run the FPTAS on `graph` with `config`.
///
/// Errors only for an invalid request (unknown endpoint, empty graph,
/// invalid parameter). `Infeasible` and `BudgetExceeded` are returned as
/// `Outcome`s.
pub fn solve(graph: &Graph, config: &SolverConfig) -> Result<Solution> {
    // Phase 1: Init
    config.validate()?;
    let (source, target) = config.endpoints(graph)?;
    let ctx = SearchContext::new(graph, config, source, target);
    let mut tracker = BudgetTracker::new(config.budget);
    let mut arena = LabelArena::new();

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        source = graph.name(source),
        target = graph.name(target),
        epsilon = config.epsilon,
        constraint = ctx.constraint,
        scheme = ?config.scheme,
        variant = ?config.variant,
        "solve started"
    );

    // Phase 2: Relaxation
    let mut run = match config.variant {
        Variant::Layered => layered::relax(&ctx, &mut arena, &mut tracker),
        Variant::Worklist => worklist::relax(&ctx, &mut arena, &mut tracker),
    };

    let remap = arena.compact(run.frontier.labels().collect::<Vec<_>>());
    run.frontier.remap(&remap);

    let mut stats = SolveStats {
        rounds: run.rounds,
        expansions: tracker.expansions(),
        labels_created: arena.created(),
        labels_live: arena.len(),
        elapsed_ms: 0,
    };

    let outcome = if run.exhausted {
        Outcome::BudgetExceeded { rounds_completed: run.rounds }
    } else {
        // Phase 3: Selection
        let best = select::best_label(
            &arena,
            run.frontier.node(target.index()),
            config.objective,
            ctx.constraint,
        );

        // Phase 4: Reconstruction
        match best {
            Some(id) => Outcome::Found(reconstruct::path_result(graph, &arena, id, ctx.constraint)),
            None => Outcome::Infeasible,
        }
    };

    stats.elapsed_ms = tracker.elapsed_ms();
    match &outcome {
        Outcome::Found(p) => tracing::info!(
            reward = p.total_reward,
            penalty = p.total_penalty,
            hops = p.len(),
            rounds = stats.rounds,
            labels = stats.labels_created,
            "solve finished"
        ),
        other => tracing::info!(outcome = ?other, rounds = stats.rounds, "solve finished without a path"),
    }

    Ok(Solution { outcome, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn line() -> Graph {
        let mut b = GraphBuilder::new();
        b.connect("a", "b", EdgeCost::new(1.0, 2.0)).unwrap();
        b.connect("b", "c", EdgeCost::new(3.0, 4.0)).unwrap();
        b.connect("b", "a", EdgeCost::new(1.0, 0.0)).unwrap();
        b.build()
    }

    #[test]
    fn test_extend_accumulates_and_tracks_visited() {
        let g = line();
        let config = SolverConfig::new(0.1).with_source("a").with_target("c");
        let (s, t) = config.endpoints(&g).unwrap();
        let ctx = SearchContext::new(&g, &config, s, t);
        let mut arena = LabelArena::new();
        let (_, root) = ctx.root();
        let root_id = arena.push(root);

        let ab = g.outgoing_edges(s)[0];
        let (_, pending) = ctx.extend(arena.get(root_id), root_id, &ab).unwrap();
        assert_eq!((pending.reward, pending.penalty, pending.hops), (1.0, 2.0, 1));
        let b_id = arena.push(pending.into_label());

        // b -> a revisits the source
        let b = g.resolve("b").unwrap();
        let back = g.outgoing_edges(b).iter().find(|e| g.name(e.dst) == "a").copied().unwrap();
        assert!(ctx.extend(arena.get(b_id), b_id, &back).is_none());
    }

    #[test]
    fn test_extend_respects_constraint() {
        let g = line();
        let config = SolverConfig::new(0.1).with_source("a").with_target("c").with_constraint(5.0);
        let (s, t) = config.endpoints(&g).unwrap();
        let ctx = SearchContext::new(&g, &config, s, t);
        let mut arena = LabelArena::new();
        let root_id = arena.push(ctx.root().1);

        let ab = g.outgoing_edges(s)[0];
        let (_, pending) = ctx.extend(arena.get(root_id), root_id, &ab).unwrap();
        let b_id = arena.push(pending.into_label());

        let bc = g.outgoing_edges(g.resolve("b").unwrap()).iter()
            .find(|e| g.name(e.dst) == "c").copied().unwrap();
        // 2 + 4 > 5
        assert!(ctx.extend(arena.get(b_id), b_id, &bc).is_none());
    }

    #[test]
    fn test_budget_tracker() {
        let mut tracker = BudgetTracker::new(Budget { max_expansions: Some(3), max_duration_ms: None });
        assert!(!tracker.exhausted());
        tracker.record(2);
        assert!(!tracker.exhausted());
        tracker.record(1);
        assert!(tracker.exhausted());
        assert!(!BudgetTracker::new(Budget::unlimited()).exhausted());
    }
}
