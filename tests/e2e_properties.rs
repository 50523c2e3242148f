//! Property tests on random graphs.
//!
//! Graphs come from `graph::generate` with a proptest-chosen seed, so a
//! shrunk failure is reproducible from the printed seed alone. Node counts
//! stay small enough for `ExhaustiveOracle` to enumerate every simple path.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rrsp_fptas::fptas::bucket::{Bucketer, RewardBucketing};
use rrsp_fptas::graph::generate::{random_graph, CostDistribution, RandomGraphConfig};
use rrsp_fptas::{
    ApproximationReport, BucketScheme, ExactSolver, ExhaustiveOracle, Graph, Outcome,
    SolverConfig, Variant,
};

// ============================================================================
// Strategies
// ============================================================================

fn graph(seed: u64, nodes: usize, edges: usize, acyclic: bool) -> Graph {
    let config = RandomGraphConfig {
        nodes,
        edges,
        acyclic,
        costs: CostDistribution::RewardPenalty { max_reward: 10, max_penalty: 10 },
    };
    random_graph(&config, &mut StdRng::seed_from_u64(seed))
}

fn scheme() -> impl Strategy<Value = BucketScheme> {
    prop_oneof![Just(BucketScheme::Multiplicative), Just(BucketScheme::Additive)]
}

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![Just(Variant::Layered), Just(Variant::Worklist)]
}

fn epsilon() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.05), Just(0.1), Just(0.25), Just(0.5)]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    /// Layered relaxation on a DAG: feasible iff the optimum is, and the
    /// reward is within (1 − ε) of it.
    #[test]
    fn prop_layered_within_bound_on_dags(
        seed in any::<u64>(),
        nodes in 2usize..8,
        edges in 1usize..24,
        constraint in 0u32..30,
        eps in epsilon(),
        scheme in scheme(),
    ) {
        let g = graph(seed, nodes, edges, true);
        let config = SolverConfig::new(eps)
            .with_constraint(constraint as f64)
            .with_scheme(scheme)
            .with_variant(Variant::Layered);

        let approx = rrsp_fptas::solve(&g, &config).unwrap().outcome;
        let exact = ExhaustiveOracle.solve_exact(&g, &config).unwrap();

        prop_assert_eq!(approx.is_found(), exact.is_found(), "approx {:?} exact {:?}", approx, exact);
        if let Some(report) = ApproximationReport::compare(&approx, &exact, eps) {
            prop_assert!(report.within_bound, "{:?}", report);
        }
    }

    /// With ε ≤ 0 the buckets are exact and the DAG optimum is recovered.
    #[test]
    fn prop_exact_buckets_match_oracle_on_dags(
        seed in any::<u64>(),
        nodes in 2usize..8,
        edges in 1usize..24,
        constraint in 0u32..30,
    ) {
        let g = graph(seed, nodes, edges, true);
        let config = SolverConfig::new(0.0).with_constraint(constraint as f64);

        let approx = rrsp_fptas::solve(&g, &config).unwrap().outcome;
        let exact = ExhaustiveOracle.solve_exact(&g, &config).unwrap();

        prop_assert_eq!(
            approx.path().map(|p| p.total_reward),
            exact.path().map(|p| p.total_reward)
        );
    }

    /// Any returned path is simple, runs between the endpoints, respects C,
    /// and its totals equal the sum of its edges, on cyclic graphs too.
    #[test]
    fn prop_returned_paths_are_sound(
        seed in any::<u64>(),
        nodes in 2usize..8,
        edges in 0usize..40,
        constraint in 0u32..30,
        eps in epsilon(),
        scheme in scheme(),
        variant in variant(),
    ) {
        let g = graph(seed, nodes, edges, false);
        let config = SolverConfig::new(eps)
            .with_constraint(constraint as f64)
            .with_scheme(scheme)
            .with_variant(variant);

        let approx = rrsp_fptas::solve(&g, &config).unwrap().outcome;
        let exact = ExhaustiveOracle.solve_exact(&g, &config).unwrap();

        match &approx {
            Outcome::Found(p) => {
                prop_assert!(p.is_simple(), "{:?}", p.path);
                prop_assert_eq!(p.source(), "n0");
                prop_assert_eq!(p.target(), format!("n{}", nodes - 1));
                prop_assert!(p.constraint_satisfied);
                prop_assert!(p.total_penalty <= constraint as f64);

                let cost = g.path_cost(&p.path);
                prop_assert!(cost.is_some(), "not a path of the graph: {:?}", p.path);
                let cost = cost.unwrap();
                prop_assert_eq!(cost.reward, p.total_reward);
                prop_assert_eq!(cost.penalty, p.total_penalty);

                let best = exact.path().map(|e| e.total_reward);
                prop_assert!(best.is_some_and(|r| p.total_reward <= r + 1e-9));
            }
            // a kept label may block the optimum's continuation on a cycle
            Outcome::Infeasible => {}
            Outcome::BudgetExceeded { .. } => prop_assert!(false, "no budget was set"),
        }
    }

    /// A bigger reward never lands in a smaller bucket.
    #[test]
    fn prop_buckets_monotone(
        a in 0.0f64..1e6,
        b in 0.0f64..1e6,
        eps in 0.01f64..1.0,
        nodes in 2usize..200,
        scheme in scheme(),
    ) {
        let bucketer = Bucketer::new(scheme, eps, nodes, 1e6);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bucketer.bucket(lo) <= bucketer.bucket(hi));
    }
}
