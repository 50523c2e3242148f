//! Export round-trip: generate a graph → export_csv() → load_csv() → same
//! graph, same answer.
//!
//! Also checks the human-readable path breakdown against the solver's totals.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rrsp_fptas::export::{export_csv, write_path_details, write_summary};
use rrsp_fptas::graph::generate::{random_graph, CostDistribution, RandomGraphConfig};
use rrsp_fptas::graph::loader::load_csv;
use rrsp_fptas::{Graph, Outcome, RecordFormat, SolverConfig};

fn generated(seed: u64, costs: CostDistribution) -> Graph {
    let config = RandomGraphConfig { nodes: 12, edges: 40, acyclic: false, costs };
    random_graph(&config, &mut StdRng::seed_from_u64(seed))
}

fn reload(graph: &Graph) -> Graph {
    let mut buf = Vec::new();
    export_csv(graph, &mut buf).unwrap();
    let (back, report) = load_csv(buf.as_slice(), RecordFormat::Auto).unwrap();
    assert_eq!(report.format, RecordFormat::RewardPenalty);
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(report.records_loaded, graph.edge_count());
    back
}

#[test]
fn test_roundtrip_preserves_every_edge() {
    let g = generated(7, CostDistribution::default());
    let back = reload(&g);

    // Isolated nodes have no record to come back from.
    assert!(back.node_count() <= g.node_count());
    assert_eq!(back.edge_count(), g.edge_count());
    for edge in g.edges() {
        let (u, v) = (g.name(edge.src), g.name(edge.dst));
        assert_eq!(back.edge_cost_by_name(u, v), Some(edge.cost), "{u} -> {v}");
    }
}

#[test]
fn test_roundtrip_signed_weights_become_two_columns() {
    let g = generated(11, CostDistribution::SignedWeight { range: 5 });
    for edge in g.edges() {
        assert!(edge.cost.reward == 0.0 || edge.cost.penalty == 0.0);
    }
    let back = reload(&g);
    assert_eq!(back.edge_count(), g.edge_count());
}

#[test]
fn test_roundtrip_same_solution() {
    let g = generated(3, CostDistribution::default());
    let back = reload(&g);
    let config = SolverConfig::new(0.2)
        .with_source("n0")
        .with_target("n11")
        .with_constraint(15.0);

    let before = rrsp_fptas::solve(&g, &config).unwrap().outcome;
    let after = rrsp_fptas::solve(&back, &config).unwrap().outcome;
    assert_eq!(
        before.path().map(|p| (p.total_reward, p.total_penalty)),
        after.path().map(|p| (p.total_reward, p.total_penalty)),
    );
}

#[test]
fn test_path_details_match_totals() {
    let g = generated(5, CostDistribution::default());
    let config = SolverConfig::new(0.1).with_source("n0").with_target("n11");
    let outcome = rrsp_fptas::solve(&g, &config).unwrap().outcome;

    let mut summary = Vec::new();
    write_summary(&outcome, &mut summary).unwrap();
    let summary = String::from_utf8(summary).unwrap();

    match outcome {
        Outcome::Found(p) => {
            let mut details = Vec::new();
            write_path_details(&g, &p.path, &mut details).unwrap();
            let details = String::from_utf8(details).unwrap();

            assert_eq!(details.lines().filter(|l| l.contains(" -> ")).count(), p.len());
            assert!(summary.starts_with(&format!("Best path: {}", p.path.join(" -> "))));
        }
        Outcome::Infeasible => {
            assert_eq!(summary, "No path found that satisfies the constraint.\n");
        }
        Outcome::BudgetExceeded { .. } => unreachable!("no budget was set"),
    }
}
