//! Layered relaxation: the variant that carries the (1+ε) guarantee.
//!
//! Round 0 holds only the root label. Round i starts as a copy of round
//! i−1 and then absorbs every label obtained by extending a round i−1 label
//! along one more edge. Rounds read only the previous frontier, so each
//! destination node can be relaxed independently; with the `parallel`
//! feature they are, on the rayon pool.
//!
//! A destination's candidates are collected as `Slot`s first and only the
//! survivors are pushed to the arena, in destination order, once the round
//! is complete. Serial and parallel runs therefore build identical arenas.

use std::collections::BTreeMap;

use super::bucket::BucketKey;
use super::frontier::{Frontier, NodeFrontier};
use super::label::{LabelArena, LabelId, PendingLabel};
use super::{BudgetTracker, RelaxationRun, SearchContext};
use crate::model::NodeId;

/// Compact once the arena is this many times larger than the frontier.
const COMPACT_RATIO: usize = 4;
/// Never bother compacting small arenas.
const COMPACT_MIN: usize = 4096;

/// A bucket's occupant while a round is being built.
#[derive(Debug, Clone)]
enum Slot {
    /// Carried over from the previous round.
    Kept(LabelId),
    New(PendingLabel),
}

impl Slot {
    fn penalty(&self, arena: &LabelArena) -> f64 {
        match self {
            Slot::Kept(id) => arena.get(*id).penalty,
            Slot::New(p) => p.penalty,
        }
    }
}

/// Result of relaxing every incoming edge of one destination.
#[derive(Debug)]
struct Relaxed {
    slots: BTreeMap<BucketKey, Slot>,
    expansions: u64,
    accepted: usize,
}

/// Relax all edges into `dst` from labels of `prev`.
fn relax_destination(ctx: &SearchContext<'_>, arena: &LabelArena, prev: &Frontier, dst: NodeId) -> Relaxed {
    let mut slots: BTreeMap<BucketKey, Slot> = prev.node(dst.index())
        .iter()
        .map(|(b, id)| (b, Slot::Kept(id)))
        .collect();
    let mut expansions = 0u64;
    let mut accepted = 0usize;

    for edge in ctx.graph.incoming_edges(dst) {
        for pred in prev.node(edge.src.index()).labels() {
            expansions += 1;
            let Some((bucket, pending)) = ctx.extend(arena.get(pred), pred, edge) else {
                continue;
            };
            if slots.get(&bucket).is_some_and(|s| s.penalty(arena) <= pending.penalty) {
                continue;
            }
            slots.insert(bucket, Slot::New(pending));
            accepted += 1;
        }
    }

    Relaxed { slots, expansions, accepted }
}

/// Give surviving candidates arena slots and build the node's frontier.
fn commit(arena: &mut LabelArena, relaxed: Relaxed) -> (NodeFrontier, usize) {
    let mut node = NodeFrontier::new();
    let mut added = 0;
    for (bucket, slot) in relaxed.slots {
        let id = match slot {
            Slot::Kept(id) => id,
            Slot::New(pending) => {
                added += 1;
                arena.push(pending.into_label())
            }
        };
        node.insert_unchecked(bucket, id);
    }
    (node, added)
}

#[cfg(not(feature = "parallel"))]
fn relax_round(
    ctx: &SearchContext<'_>,
    arena: &LabelArena,
    prev: &Frontier,
    tracker: &mut BudgetTracker,
) -> Option<Vec<Relaxed>> {
    let mut out = Vec::with_capacity(ctx.node_count());
    for dst in ctx.graph.nodes() {
        if tracker.exhausted() {
            return None;
        }
        let relaxed = relax_destination(ctx, arena, prev, dst);
        tracker.record(relaxed.expansions);
        out.push(relaxed);
    }
    Some(out)
}

#[cfg(feature = "parallel")]
fn relax_round(
    ctx: &SearchContext<'_>,
    arena: &LabelArena,
    prev: &Frontier,
    tracker: &mut BudgetTracker,
) -> Option<Vec<Relaxed>> {
    use rayon::prelude::*;

    let out: Vec<Relaxed> = (0..ctx.node_count() as u32)
        .into_par_iter()
        .map(|i| relax_destination(ctx, arena, prev, NodeId(i)))
        .collect();
    tracker.record(out.iter().map(|r| r.expansions).sum());
    Some(out)
}

/// Run rounds 1..=n−1 from the root label.
pub fn relax(ctx: &SearchContext<'_>, arena: &mut LabelArena, tracker: &mut BudgetTracker) -> RelaxationRun {
    let mut frontier = Frontier::new(ctx.node_count());
    let (root_bucket, root) = ctx.root();
    let root_id = arena.push(root);
    frontier.node_mut(ctx.source.index()).insert_unchecked(root_bucket, root_id);

    let mut rounds = 0;
    for round in 1..=ctx.max_hops as usize {
        if tracker.exhausted() {
            return RelaxationRun { frontier, rounds, exhausted: true };
        }

        let Some(relaxed) = relax_round(ctx, arena, &frontier, tracker) else {
            return RelaxationRun { frontier, rounds, exhausted: true };
        };

        let candidates: usize = relaxed.iter().map(|r| r.accepted).sum();
        let mut nodes = Vec::with_capacity(relaxed.len());
        let mut added = 0;
        for r in relaxed {
            let (node, n) = commit(arena, r);
            added += n;
            nodes.push(node);
        }
        frontier = Frontier::from_nodes(nodes);
        rounds = round;

        tracing::debug!(
            round,
            candidates,
            added,
            frontier = frontier.len(),
            arena = arena.len(),
            expansions = tracker.expansions(),
            "round relaxed"
        );

        // Nothing changed: every later round would read this same frontier.
        if added == 0 {
            break;
        }

        if arena.len() >= COMPACT_MIN && arena.len() > COMPACT_RATIO * frontier.len() {
            let remap = arena.compact(frontier.labels().collect::<Vec<_>>());
            frontier.remap(&remap);
        }
    }

    RelaxationRun { frontier, rounds, exhausted: false }
}
