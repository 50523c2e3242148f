//! Reward rounding.
//!
//! With δ = ε / (n − 1), two rewards in the same bucket differ by at most a
//! factor (1+δ) (multiplicative) or by at most δ (additive). A path has at
//! most n − 1 edges, so the per-edge loss composes to the overall (1+ε)
//! bound.
//!
//! Bucket keys are totally ordered `i64`s and `bucket` is monotonic
//! non-decreasing in the reward.

use serde::{Deserialize, Serialize};

use crate::config::BucketScheme;

/// Ordered bucket index.
pub type BucketKey = i64;

/// Multiplicative class reserved for reward 0, below every positive reward.
pub const ZERO_CLASS: BucketKey = i64::MIN;

/// Slack added before the additive division so exact multiples of δ land
/// in their own bucket despite rounding.
const ADDITIVE_SLACK: f64 = 1e-9;

/// Maps an accumulated reward to its bucket.
pub trait RewardBucketing {
    fn bucket(&self, reward: f64) -> BucketKey;
}

/// Concrete bucket function chosen from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bucketer {
    Multiplicative { delta: f64, ln_base: f64 },
    Additive { delta: f64, num_buckets: i64 },
    /// ε ≤ 0: every distinct reward is its own bucket.
    Exact,
    /// n ≤ 1: nothing to distinguish.
    Single,
}

impl Bucketer {
    /// Build the bucket function for a graph of `node_count` nodes.
    ///
    /// `max_reward_bound` is `Wx`, the largest reward any simple path can
    /// accumulate; it only matters for the additive scheme.
    pub fn new(scheme: BucketScheme, epsilon: f64, node_count: usize, max_reward_bound: f64) -> Self {
        if node_count <= 1 {
            return Bucketer::Single;
        }
        if epsilon <= 0.0 {
            tracing::warn!(epsilon, "non-positive epsilon, falling back to exact buckets");
            return Bucketer::Exact;
        }

        let delta = epsilon / (node_count - 1) as f64;
        match scheme {
            BucketScheme::Multiplicative => Bucketer::Multiplicative {
                delta,
                ln_base: delta.ln_1p(),
            },
            BucketScheme::Additive => {
                let buckets = (max_reward_bound / delta).ceil() + 1.0;
                let num_buckets = if buckets >= i64::MAX as f64 { i64::MAX } else { buckets as i64 };
                Bucketer::Additive { delta, num_buckets: num_buckets.max(1) }
            }
        }
    }

    /// δ, or 0 for the degenerate schemes.
    pub fn delta(&self) -> f64 {
        match *self {
            Bucketer::Multiplicative { delta, .. } | Bucketer::Additive { delta, .. } => delta,
            Bucketer::Exact | Bucketer::Single => 0.0,
        }
    }

    /// Size of the bucket space when it is bounded up front.
    pub fn num_buckets(&self) -> Option<i64> {
        match *self {
            Bucketer::Additive { num_buckets, .. } => Some(num_buckets),
            Bucketer::Single => Some(1),
            _ => None,
        }
    }
}

impl RewardBucketing for Bucketer {
    fn bucket(&self, reward: f64) -> BucketKey {
        match *self {
            Bucketer::Multiplicative { ln_base, .. } => {
                if reward <= 0.0 {
                    ZERO_CLASS
                } else {
                    // `as` saturates, so huge or tiny rewards stay ordered
                    (reward.ln() / ln_base).floor() as i64
                }
            }
            Bucketer::Additive { delta, num_buckets } => {
                if reward <= 0.0 {
                    0
                } else {
                    (((reward + ADDITIVE_SLACK) / delta).floor() as i64).min(num_buckets - 1)
                }
            }
            // Non-negative IEEE-754 doubles order the same as their bit patterns.
            Bucketer::Exact => reward.max(0.0).to_bits() as i64,
            Bucketer::Single => 0,
        }
    }
}
