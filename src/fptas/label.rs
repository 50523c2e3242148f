//! Labels and the arena that owns them.
//!
//! A label is one candidate partial path: accumulated reward and penalty,
//! a handle to its predecessor, the edge that produced it, and the set of
//! nodes already on the path. Labels are immutable once pushed.
//!
//! Predecessors are `LabelId` handles into a `LabelArena`, so chains are
//! walked with a loop and a label is kept alive exactly as long as some
//! frontier entry reaches it. `LabelArena::compact` drops the rest.

use smallvec::SmallVec;

use crate::model::NodeId;

// ============================================================================
// VisitedSet
// ============================================================================

/// Fixed-width bitset over node indices.
///
/// Graphs up to 256 nodes stay inline; extending a set copies
/// `n / 64` words, never a hash table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitedSet {
    words: SmallVec<[u64; 4]>,
}

impl VisitedSet {
    /// Empty set sized for `node_count` nodes.
    pub fn with_capacity(node_count: usize) -> Self {
        let mut words = SmallVec::new();
        words.resize(node_count.div_ceil(64), 0);
        Self { words }
    }

    pub fn singleton(node_count: usize, node: NodeId) -> Self {
        let mut set = Self::with_capacity(node_count);
        set.insert(node);
        set
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        let i = node.index();
        self.words.get(i / 64).is_some_and(|w| w & (1u64 << (i % 64)) != 0)
    }

    pub fn insert(&mut self, node: NodeId) {
        let i = node.index();
        if i / 64 >= self.words.len() {
            self.words.resize(i / 64 + 1, 0);
        }
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    /// A copy of `self` with `node` added.
    pub fn extended(&self, node: NodeId) -> Self {
        let mut next = self.clone();
        next.insert(node);
        next
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

// ============================================================================
// Label
// ============================================================================

/// Handle into a `LabelArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(pub u32);

impl LabelId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One candidate partial path ending at `node`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub node: NodeId,
    pub reward: f64,
    pub penalty: f64,
    /// `None` only for the root label at the source.
    pub pred: Option<LabelId>,
    /// `(from, to)` of the edge that produced this label.
    pub edge: Option<(NodeId, NodeId)>,
    /// Edges on the path so far.
    pub hops: u32,
    pub visited: VisitedSet,
}

impl Label {
    /// The zero-cost label at the source.
    pub fn root(source: NodeId, node_count: usize) -> Self {
        Self {
            node: source,
            reward: 0.0,
            penalty: 0.0,
            pred: None,
            edge: None,
            hops: 0,
            visited: VisitedSet::singleton(node_count, source),
        }
    }

    pub fn is_root(&self) -> bool {
        self.pred.is_none()
    }
}

/// A label that has passed the feasibility filters but has not been given
/// an arena slot yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLabel {
    pub reward: f64,
    pub penalty: f64,
    pub pred: LabelId,
    pub edge: (NodeId, NodeId),
    pub hops: u32,
    pub visited: VisitedSet,
}

impl PendingLabel {
    pub fn into_label(self) -> Label {
        Label {
            node: self.edge.1,
            reward: self.reward,
            penalty: self.penalty,
            pred: Some(self.pred),
            edge: Some(self.edge),
            hops: self.hops,
            visited: self.visited,
        }
    }
}

// ============================================================================
// LabelArena
// ============================================================================

/// Append-only label storage. A predecessor is always pushed before its
/// successors, so `pred < id` holds for every label.
#[derive(Debug, Default)]
pub struct LabelArena {
    labels: Vec<Label>,
    created: u64,
}

impl LabelArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: Label) -> LabelId {
        debug_assert!(label.pred.is_none_or(|p| p.index() < self.labels.len()));
        let id = LabelId(self.labels.len() as u32);
        self.labels.push(label);
        self.created += 1;
        id
    }

    #[inline]
    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ever pushed, including compacted ones.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Iterate `id` and its ancestors, ending at the root.
    pub fn chain(&self, id: LabelId) -> impl Iterator<Item = (LabelId, &Label)> + '_ {
        std::iter::successors(Some(id), move |cur| self.get(*cur).pred)
            .map(move |cur| (cur, self.get(cur)))
    }

    /// Keep only labels reachable from `roots`, returning the old → new
    /// handle mapping. Order, and so `pred < id`, is preserved.
    pub fn compact(&mut self, roots: impl IntoIterator<Item = LabelId>) -> Remap {
        let mut live = vec![false; self.labels.len()];
        for root in roots {
            let mut cur = Some(root);
            while let Some(id) = cur {
                if live[id.index()] {
                    break;
                }
                live[id.index()] = true;
                cur = self.labels[id.index()].pred;
            }
        }

        let mut map = vec![None; self.labels.len()];
        let mut next = 0u32;
        for (i, keep) in live.iter().enumerate() {
            if *keep {
                map[i] = Some(LabelId(next));
                next += 1;
            }
        }

        let before = self.labels.len();
        let old = std::mem::take(&mut self.labels);
        self.labels = old.into_iter()
            .enumerate()
            .filter(|(i, _)| live[*i])
            .map(|(_, mut label)| {
                label.pred = label.pred.and_then(|p| map[p.index()]);
                label
            })
            .collect();

        tracing::trace!(before, after = self.labels.len(), "label arena compacted");
        Remap { map }
    }
}

/// Old → new handle mapping produced by `LabelArena::compact`.
#[derive(Debug)]
pub struct Remap {
    map: Vec<Option<LabelId>>,
}

impl Remap {
    /// New handle of a label that was kept.
    pub fn get(&self, old: LabelId) -> Option<LabelId> {
        self.map.get(old.index()).copied().flatten()
    }
}
