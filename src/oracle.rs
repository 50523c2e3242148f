//! # Exact baseline
//!
//! The FPTAS is checked against an exact solver given the same graph,
//! endpoints and constraint. `ExactSolver` is the seam: an integer
//! programming backend can implement it out of tree; `ExhaustiveOracle`
//! enumerates every simple path and is practical for small graphs (tests,
//! spot checks).
//!
//! Both report through the same `Outcome` contract, and
//! `ApproximationReport` compares the two.

use serde::{Deserialize, Serialize};

use crate::config::{Objective, SolverConfig};
use crate::fptas::select::improves;
use crate::fptas::BudgetTracker;
use crate::graph::Graph;
use crate::model::*;
use crate::Result;

/// A solver that returns an optimal path (or proves there is none).
pub trait ExactSolver {
    fn solve_exact(&self, graph: &Graph, config: &SolverConfig) -> Result<Outcome>;
}

/// Depth-first enumeration of simple paths with penalty pruning.
///
/// Honours `config.budget` (one expansion per edge followed); exhaustion
/// yields `Outcome::BudgetExceeded`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveOracle;

impl ExactSolver for ExhaustiveOracle {
    fn solve_exact(&self, graph: &Graph, config: &SolverConfig) -> Result<Outcome> {
        config.validate()?;
        let (source, target) = config.endpoints(graph)?;
        let constraint = config.constraint_or_inf();
        let mut tracker = BudgetTracker::new(config.budget);

        let mut on_path = vec![false; graph.node_count()];
        on_path[source.index()] = true;
        let mut path = vec![source];
        // (node, next outgoing edge to try, cost so far)
        let mut stack: Vec<(NodeId, usize, EdgeCost)> = vec![(source, 0, EdgeCost::ZERO)];
        let mut best: Option<(Vec<NodeId>, EdgeCost)> = None;

        if source == target {
            best = Some((path.clone(), EdgeCost::ZERO));
        }

        while let Some(top) = stack.last_mut() {
            let (node, next, cost) = *top;
            let edges = graph.outgoing_edges(node);
            if next >= edges.len() || node == target {
                stack.pop();
                path.pop();
                on_path[node.index()] = false;
                continue;
            }
            top.1 += 1;

            if tracker.exhausted() {
                return Ok(Outcome::BudgetExceeded { rounds_completed: 0 });
            }
            tracker.record(1);

            let edge = edges[next];
            if on_path[edge.dst.index()] {
                continue;
            }
            let reached = cost + edge.cost;
            if reached.penalty > constraint {
                continue;
            }

            on_path[edge.dst.index()] = true;
            path.push(edge.dst);
            stack.push((edge.dst, 0, reached));

            if edge.dst == target {
                let better = match &best {
                    None => true,
                    Some((_, b)) => improves(
                        config.objective,
                        (reached.reward, reached.penalty),
                        (b.reward, b.penalty),
                    ),
                };
                if better {
                    best = Some((path.clone(), reached));
                }
            }
        }

        tracing::debug!(expansions = tracker.expansions(), found = best.is_some(), "exhaustive search done");

        Ok(match best {
            Some((nodes, cost)) => Outcome::Found(PathResult {
                path: nodes.into_iter().map(|n| graph.name(n).to_string()).collect(),
                total_reward: cost.reward,
                total_penalty: cost.penalty,
                constraint_satisfied: cost.penalty <= constraint,
            }),
            None => Outcome::Infeasible,
        })
    }
}

/// How an approximate solution compares to the exact one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximationReport {
    pub exact_reward: f64,
    pub approx_reward: f64,
    /// `approx / exact`, 1 when both are 0.
    pub ratio: f64,
    /// `exact × (1 − ε)`.
    pub lower_bound: f64,
    /// `lower_bound ≤ approx ≤ exact`.
    pub within_bound: bool,
}

impl ApproximationReport {
    /// Compare reward-maximizing outcomes. `None` unless both found a path.
    pub fn compare(approx: &Outcome, exact: &Outcome, epsilon: f64) -> Option<Self> {
        let (a, e) = (approx.path()?, exact.path()?);
        const TOLERANCE: f64 = 1e-9;

        let lower_bound = e.total_reward * (1.0 - epsilon.max(0.0));
        let ratio = if e.total_reward == 0.0 { 1.0 } else { a.total_reward / e.total_reward };
        let within_bound = a.total_reward + TOLERANCE >= lower_bound
            && a.total_reward <= e.total_reward + TOLERANCE;

        Some(Self {
            exact_reward: e.total_reward,
            approx_reward: a.total_reward,
            ratio,
            lower_bound,
            within_bound,
        })
    }
}

/// Solve approximately and exactly, returning both and their comparison.
pub fn cross_check<S: ExactSolver>(
    exact: &S,
    graph: &Graph,
    config: &SolverConfig,
) -> Result<(Solution, Outcome, Option<ApproximationReport>)> {
    let approx = crate::fptas::solve(graph, config)?;
    let optimal = exact.solve_exact(graph, config)?;
    let report = match config.objective {
        Objective::MaxReward => ApproximationReport::compare(&approx.outcome, &optimal, config.epsilon),
        Objective::NetValue => None,
    };
    Ok((approx, optimal, report))
}
