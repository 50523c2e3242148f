//! # rrsp-fptas — Restricted Rewarding Shortest Path, approximately
//!
//! Finds a simple directed path from a source to a target that maximizes
//! accumulated reward while keeping accumulated penalty under a hard bound C.
//! The exact problem needs integer programming; this crate implements the
//! Fully-Polynomial-Time Approximation Scheme: a label-correcting search that
//! keeps one label per (node, reward bucket) and relaxes every edge for
//! exactly n−1 rounds.
//!
//! ## Design Principles
//!
//! 1. **Pure DTOs**: `NodeId`, `EdgeCost`, `PathResult`, `Outcome` cross all boundaries
//! 2. **Immutable graph**: built once by `GraphBuilder`, read-only while solving
//! 3. **Arena labels**: predecessor chains are integer handles, never nested boxes
//! 4. **Typed outcomes**: `Infeasible` and `BudgetExceeded` are results, not errors
//!
//! ## Quick Start
//!
//! ```rust
//! use rrsp_fptas::{GraphBuilder, EdgeCost, SolverConfig, Outcome};
//!
//! # fn example() -> rrsp_fptas::Result<()> {
//! let mut builder = GraphBuilder::new();
//! builder.connect("n0", "n1", EdgeCost::new(5.0, 0.0))?;
//! builder.connect("n1", "n2", EdgeCost::new(0.0, 3.0))?;
//! builder.connect("n0", "n2", EdgeCost::new(2.0, 0.0))?;
//! let graph = builder.build();
//!
//! let config = SolverConfig::new(0.1).with_constraint(3.0);
//! let solution = rrsp_fptas::solve(&graph, &config)?;
//!
//! if let Outcome::Found(best) = &solution.outcome {
//!     assert_eq!(best.path, vec!["n0", "n1", "n2"]);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Variants
//!
//! | Variant | Feature | Description |
//! |---------|---------|-------------|
//! | Layered | (default) | n−1 rounds over an immutable previous frontier |
//! | Layered, parallel | `parallel` | Same rounds, destinations relaxed on rayon |
//! | Worklist | (default) | FIFO node queue, hop-bounded to n−1 |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod config;
pub mod fptas;
pub mod oracle;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    NodeId, Edge, EdgeCost,
    PathResult, Outcome, Solution, SolveStats,
};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use graph::{Graph, GraphBuilder};
pub use graph::loader::{RecordFormat, LoadReport, SkippedRecord};

// ============================================================================
// Re-exports: Configuration and solving
// ============================================================================

pub use config::{SolverConfig, BucketScheme, Variant, Objective, Budget};
pub use fptas::solve;
pub use oracle::{ExactSolver, ExhaustiveOracle, ApproximationReport};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("Invalid cost on edge {src} -> {dst}: {message}")]
    InvalidCost { src: String, dst: String, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
