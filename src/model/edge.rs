//! Directed edge and its (reward, penalty) attribute pair.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// The two accumulated dimensions of a path step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeCost {
    pub reward: f64,
    pub penalty: f64,
}

impl EdgeCost {
    pub const ZERO: EdgeCost = EdgeCost { reward: 0.0, penalty: 0.0 };

    pub fn new(reward: f64, penalty: f64) -> Self {
        Self { reward, penalty }
    }

    /// Single-dimension input: a positive weight is reward, a negative one
    /// is penalty.
    pub fn from_signed_weight(weight: f64) -> Self {
        Self {
            reward: weight.max(0.0),
            penalty: (-weight).max(0.0),
        }
    }

    /// Net value of the step, `reward − penalty`.
    pub fn net(&self) -> f64 {
        self.reward - self.penalty
    }

    /// Both components finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.reward.is_finite() && self.penalty.is_finite()
            && self.reward >= 0.0 && self.penalty >= 0.0
    }
}

impl std::ops::Add for EdgeCost {
    type Output = EdgeCost;

    fn add(self, rhs: EdgeCost) -> EdgeCost {
        EdgeCost {
            reward: self.reward + rhs.reward,
            penalty: self.penalty + rhs.penalty,
        }
    }
}

/// A directed edge `src -> dst`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
    pub cost: EdgeCost,
}

impl Edge {
    pub fn new(src: NodeId, dst: NodeId, cost: EdgeCost) -> Self {
        Self { src, dst, cost }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_weight_split() {
        assert_eq!(EdgeCost::from_signed_weight(7.0), EdgeCost::new(7.0, 0.0));
        assert_eq!(EdgeCost::from_signed_weight(-4.0), EdgeCost::new(0.0, 4.0));
        assert_eq!(EdgeCost::from_signed_weight(0.0), EdgeCost::ZERO);
    }

    #[test]
    fn test_validity() {
        assert!(EdgeCost::new(0.0, 0.0).is_valid());
        assert!(!EdgeCost::new(-1.0, 0.0).is_valid());
        assert!(!EdgeCost::new(1.0, f64::NAN).is_valid());
        assert!(!EdgeCost::new(f64::INFINITY, 0.0).is_valid());
    }
}
