//! Outcome — what a solve (exact or approximate) returns.

use serde::{Deserialize, Serialize};
use super::PathResult;

/// Terminal state of a solve.
///
/// `Infeasible` and `BudgetExceeded` are ordinary results so batch callers
/// never have to treat "no solution" as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Found(PathResult),
    /// No label at the target satisfies the constraint.
    Infeasible,
    /// The caller-supplied expansion or time budget ran out.
    BudgetExceeded { rounds_completed: usize },
}

impl Outcome {
    pub fn path(&self) -> Option<&PathResult> {
        match self {
            Outcome::Found(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, Outcome::Infeasible)
    }
}

/// Counters collected while solving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Relaxation rounds completed (layered) or node dequeues (worklist).
    pub rounds: usize,
    /// Edge relaxations attempted.
    pub expansions: u64,
    pub labels_created: u64,
    /// Labels still reachable from the final frontier.
    pub labels_live: usize,
    pub elapsed_ms: u64,
}

/// Outcome plus the statistics of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub outcome: Outcome,
    pub stats: SolveStats,
}
