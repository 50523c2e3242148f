//! PathResult — the success half of the result contract.

use serde::{Deserialize, Serialize};

/// A reconstructed source → target path and its accumulated totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Node names along the path, `[source, ..., target]`. Never empty.
    pub path: Vec<String>,
    pub total_reward: f64,
    pub total_penalty: f64,
    pub constraint_satisfied: bool,
}

impl PathResult {
    /// Number of edges on the path.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// True for the bare-source path (source = target).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    pub fn target(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// `total_reward − total_penalty`.
    pub fn net_value(&self) -> f64 {
        self.total_reward - self.total_penalty
    }

    /// Each node appears at most once.
    pub fn is_simple(&self) -> bool {
        let mut seen = hashbrown::HashSet::with_capacity(self.path.len());
        self.path.iter().all(|n| seen.insert(n.as_str()))
    }
}
