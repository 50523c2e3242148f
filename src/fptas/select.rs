//! Best-label selection at the target.

use crate::config::Objective;

use super::frontier::NodeFrontier;
use super::label::{Label, LabelArena, LabelId};

/// Pick the winning label among all buckets of the target's frontier.
///
/// `MaxReward` considers labels with penalty ≤ `constraint` and prefers the
/// greatest reward, then the lower penalty. `NetValue` minimizes
/// `penalty − reward`, then prefers the lower penalty. Buckets are scanned in
/// order and only a strict improvement replaces the incumbent, so the result
/// is deterministic.
pub fn best_label(
    arena: &LabelArena,
    target: &NodeFrontier,
    objective: Objective,
    constraint: f64,
) -> Option<LabelId> {
    let mut best: Option<(LabelId, &Label)> = None;

    for id in target.labels() {
        let label = arena.get(id);
        if objective == Objective::MaxReward && label.penalty > constraint {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, incumbent)) => improves(
                objective,
                (label.reward, label.penalty),
                (incumbent.reward, incumbent.penalty),
            ),
        };
        if better {
            best = Some((id, label));
        }
    }

    best.map(|(id, _)| id)
}

/// Whether `(reward, penalty)` `candidate` beats `incumbent` under `objective`.
pub(crate) fn improves(objective: Objective, candidate: (f64, f64), incumbent: (f64, f64)) -> bool {
    let ((cr, cp), (ir, ip)) = (candidate, incumbent);
    match objective {
        Objective::MaxReward => cr > ir || (cr == ir && cp < ip),
        Objective::NetValue => {
            let (c, i) = (cp - cr, ip - ir);
            c < i || (c == i && cp < ip)
        }
    }
}
