//! # Routing Model
//!
//! Clean DTOs shared by the graph, the solver, the oracle and the exporters.
//! These types cross every boundary: loader ↔ graph ↔ engine ↔ caller.
//!
//! Design rule: NO arena handles, NO bucket keys here.
//! This module is pure data — no I/O, no state.

pub mod node;
pub mod edge;
pub mod path;
pub mod outcome;

pub use node::NodeId;
pub use edge::{Edge, EdgeCost};
pub use path::PathResult;
pub use outcome::{Outcome, Solution, SolveStats};
