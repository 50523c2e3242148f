//! Worklist relaxation.
//!
//! Nodes whose frontier changed are queued FIFO (each at most once at a
//! time) and every label of a dequeued node is extended along its outgoing
//! edges into a single shared frontier. Labels spanning n−1 edges are not
//! extended further, which keeps paths simple and the run polynomial.
//!
//! Usually touches far fewer labels than the layered form, but gives no
//! round-by-round guarantee: a label can be replaced before it was ever
//! extended.

use std::collections::VecDeque;

use super::frontier::Frontier;
use super::label::{LabelArena, LabelId};
use super::{BudgetTracker, RelaxationRun, SearchContext};

pub fn relax(ctx: &SearchContext<'_>, arena: &mut LabelArena, tracker: &mut BudgetTracker) -> RelaxationRun {
    let n = ctx.node_count();
    let mut frontier = Frontier::new(n);
    let (root_bucket, root) = ctx.root();
    let root_id = arena.push(root);
    frontier.node_mut(ctx.source.index()).insert_unchecked(root_bucket, root_id);

    let mut queue = VecDeque::from([ctx.source]);
    let mut in_queue = vec![false; n];
    in_queue[ctx.source.index()] = true;
    let mut dequeues = 0;

    while let Some(u) = queue.pop_front() {
        if tracker.exhausted() {
            return RelaxationRun { frontier, rounds: dequeues, exhausted: true };
        }
        in_queue[u.index()] = false;
        dequeues += 1;

        let snapshot: Vec<LabelId> = frontier.node(u.index()).labels().collect();
        let mut expansions = 0u64;

        for pred in snapshot {
            if arena.get(pred).hops >= ctx.max_hops {
                continue;
            }
            for edge in ctx.graph.outgoing_edges(u) {
                expansions += 1;
                let Some((bucket, pending)) = ctx.extend(arena.get(pred), pred, edge) else {
                    continue;
                };
                let v = edge.dst.index();
                if frontier.node(v).dominated(arena, bucket, pending.penalty) {
                    continue;
                }
                let id = arena.push(pending.into_label());
                frontier.node_mut(v).insert_unchecked(bucket, id);
                if !in_queue[v] {
                    in_queue[v] = true;
                    queue.push_back(edge.dst);
                }
            }
        }

        tracker.record(expansions);
    }

    tracing::debug!(
        dequeues,
        frontier = frontier.len(),
        arena = arena.len(),
        expansions = tracker.expansions(),
        "worklist drained"
    );

    RelaxationRun { frontier, rounds: dequeues, exhausted: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::graph::GraphBuilder;
    use crate::model::EdgeCost;

    #[test]
    fn test_cycle_is_not_followed() {
        let mut b = GraphBuilder::new();
        b.connect("n0", "n1", EdgeCost::new(1.0, 0.0)).unwrap();
        b.connect("n1", "n0", EdgeCost::new(1.0, 0.0)).unwrap();
        b.connect("n1", "n2", EdgeCost::new(1.0, 0.0)).unwrap();
        let g = b.build();

        let config = SolverConfig::new(0.1);
        let (s, t) = config.endpoints(&g).unwrap();
        let ctx = SearchContext::new(&g, &config, s, t);
        let mut arena = LabelArena::new();
        let mut tracker = BudgetTracker::new(config.budget);
        let run = relax(&ctx, &mut arena, &mut tracker);

        assert!(!run.exhausted);
        // only the root ever sits at n0
        let at_source: Vec<_> = run.frontier.node(s.index()).labels().collect();
        assert_eq!(at_source.len(), 1);
        assert!(arena.get(at_source[0]).is_root());

        let best = run.frontier.node(t.index()).labels().next().unwrap();
        assert_eq!(arena.get(best).reward, 2.0);
        assert_eq!(arena.get(best).hops, 2);
    }

    #[test]
    fn test_hop_limit() {
        // a 4-node chain needs exactly n − 1 = 3 hops
        let mut b = GraphBuilder::new();
        for (u, v) in [("n0", "n1"), ("n1", "n2"), ("n2", "n3")] {
            b.connect(u, v, EdgeCost::new(1.0, 1.0)).unwrap();
        }
        let g = b.build();
        let config = SolverConfig::new(0.1);
        let (s, t) = config.endpoints(&g).unwrap();
        let ctx = SearchContext::new(&g, &config, s, t);
        let mut arena = LabelArena::new();
        let mut tracker = BudgetTracker::new(config.budget);
        let run = relax(&ctx, &mut arena, &mut tracker);

        let at_t: Vec<_> = run.frontier.node(t.index()).labels().collect();
        assert_eq!(at_t.len(), 1);
        assert_eq!(arena.get(at_t[0]).hops, ctx.max_hops);
    }
}
