//! Solver configuration.
//!
//! Everything the engine needs besides the graph: endpoints, the penalty
//! bound C, the approximation tolerance ε, and which bucket scheme, variant
//! and objective to run. Loadable from JSON:
//!
//! ```json
//! { "source": "n0", "target": "n19", "constraint": 50, "epsilon": 0.1,
//!   "scheme": "multiplicative", "variant": "layered" }
//! ```

use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::model::NodeId;
use crate::{Error, Result};

/// Reward discretization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketScheme {
    /// `floor(log(r) / log(1+δ))` — wide reward ranges.
    #[default]
    Multiplicative,
    /// `min(floor(r/δ), num_buckets−1)` over `[0, Wx]`.
    Additive,
}

/// Relaxation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// n−1 rounds, each reading only the previous round.
    #[default]
    Layered,
    /// FIFO node queue; labels stop extending after n−1 edges.
    Worklist,
}

/// How the winning label at the target is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Greatest reward with penalty ≤ C, ties to lower penalty.
    #[default]
    MaxReward,
    /// Smallest `penalty − reward`; used with signed-weight input.
    NetValue,
}

/// Optional work limits. Exhaustion yields `Outcome::BudgetExceeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum edge relaxations.
    #[serde(default)]
    pub max_expansions: Option<u64>,
    /// Wall-clock limit in milliseconds.
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_expansions.is_none() && self.max_duration_ms.is_none()
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }
}

/// Parameters for one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Source node name; defaults to the first node in suffix order.
    pub source: Option<String>,
    /// Target node name; defaults to the last node in suffix order.
    pub target: Option<String>,
    /// Maximum total penalty C. `None` means unconstrained.
    pub constraint: Option<f64>,
    /// Approximation tolerance ε. Values ≤ 0 fall back to exact buckets.
    pub epsilon: f64,
    pub scheme: BucketScheme,
    pub variant: Variant,
    pub objective: Objective,
    pub budget: Budget,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            constraint: None,
            epsilon: 0.1,
            scheme: BucketScheme::default(),
            variant: Variant::default(),
            objective: Objective::default(),
            budget: Budget::default(),
        }
    }
}

impl SolverConfig {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let config: SolverConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_constraint(mut self, constraint: f64) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_scheme(mut self, scheme: BucketScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Reject values no fallback can make sense of.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.constraint {
            if !c.is_finite() || c < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "constraint must be finite and >= 0, got {c}"
                )));
            }
        }
        if self.epsilon.is_nan() {
            return Err(Error::InvalidParameter("epsilon is NaN".into()));
        }
        Ok(())
    }

    /// The penalty bound, `+∞` when unconstrained.
    pub fn constraint_or_inf(&self) -> f64 {
        self.constraint.unwrap_or(f64::INFINITY)
    }

    /// Resolve `(source, target)` against a graph, applying defaults.
    pub fn endpoints(&self, graph: &Graph) -> Result<(NodeId, NodeId)> {
        let (default_source, default_target) = graph.default_endpoints()?;
        let source = match &self.source {
            Some(name) => graph.resolve(name)?,
            None => default_source,
        };
        let target = match &self.target {
            Some(name) => graph.resolve(name)?,
            None => default_target,
        };
        Ok((source, target))
    }
}
