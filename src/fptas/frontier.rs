//! Label store: per node, per bucket, the one retained label.

use std::collections::BTreeMap;

use super::bucket::BucketKey;
use super::label::{LabelArena, LabelId, Remap};

/// Buckets of a single node, iterated in bucket order.
///
/// Within a bucket only the lowest-penalty label survives; a newcomer wins
/// only when its penalty is strictly lower, so ties keep the first arrival.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFrontier {
    buckets: BTreeMap<BucketKey, LabelId>,
}

impl NodeFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: BucketKey) -> Option<LabelId> {
        self.buckets.get(&bucket).copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BucketKey, LabelId)> + '_ {
        self.buckets.iter().map(|(b, id)| (*b, *id))
    }

    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.buckets.values().copied()
    }

    /// Store `id` unless the bucket holds a label with penalty ≤ its own.
    pub fn offer(&mut self, arena: &LabelArena, bucket: BucketKey, id: LabelId) -> bool {
        let penalty = arena.get(id).penalty;
        if self.dominated(arena, bucket, penalty) {
            return false;
        }
        self.buckets.insert(bucket, id);
        true
    }

    /// Whether a label with `penalty` would be rejected from `bucket`.
    pub fn dominated(&self, arena: &LabelArena, bucket: BucketKey, penalty: f64) -> bool {
        self.buckets.get(&bucket)
            .is_some_and(|existing| arena.get(*existing).penalty <= penalty)
    }

    pub(crate) fn insert_unchecked(&mut self, bucket: BucketKey, id: LabelId) {
        self.buckets.insert(bucket, id);
    }

    /// Rewrite handles after an arena compaction.
    pub fn remap(&mut self, remap: &Remap) {
        self.buckets.retain(|_, id| match remap.get(*id) {
            Some(new) => {
                *id = new;
                true
            }
            None => false,
        });
    }
}

/// One `NodeFrontier` per node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontier {
    nodes: Vec<NodeFrontier>,
}

impl Frontier {
    pub fn new(node_count: usize) -> Self {
        Self { nodes: vec![NodeFrontier::new(); node_count] }
    }

    pub fn from_nodes(nodes: Vec<NodeFrontier>) -> Self {
        Self { nodes }
    }

    pub fn node(&self, index: usize) -> &NodeFrontier {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: usize) -> &mut NodeFrontier {
        &mut self.nodes[index]
    }

    /// Total retained labels.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(NodeFrontier::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(NodeFrontier::is_empty)
    }

    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.nodes.iter().flat_map(NodeFrontier::labels)
    }

    pub fn remap(&mut self, remap: &Remap) {
        for node in &mut self.nodes {
            node.remap(remap);
        }
    }
}
