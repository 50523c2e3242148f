//! Export — write graphs and solutions back out.
//!
//! ```text
//! Graph    → export_csv()          → source,target,reward,penalty records
//! path     → write_path_details()  → per-edge breakdown + sums
//! Solution → write_solution_json() → {"outcome": {...}, "stats": {...}}
//! ```
//!
//! The CSV output is accepted by `graph::loader::load_csv` unchanged.

use std::io::Write;

use crate::graph::Graph;
use crate::model::*;
use crate::{Error, Result};

/// Write every edge as a two-dimensional CSV record, with header.
pub fn export_csv(graph: &Graph, writer: &mut dyn Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["source", "target", "reward", "penalty"])?;
    for edge in graph.edges() {
        let reward = format_number(edge.cost.reward);
        let penalty = format_number(edge.cost.penalty);
        wtr.write_record([
            graph.name(edge.src),
            graph.name(edge.dst),
            reward.as_str(),
            penalty.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Per-edge breakdown of a named node sequence followed by the sums.
///
/// Fails with `UnknownNode` if a step is not an edge of `graph`. Paths with
/// fewer than two nodes write nothing.
pub fn write_path_details(graph: &Graph, path: &[String], writer: &mut dyn Write) -> Result<()> {
    if path.len() < 2 {
        return Ok(());
    }

    writeln!(writer, "Detailed path information:")?;
    let mut total = EdgeCost::ZERO;
    for step in path.windows(2) {
        let (u, v) = (&step[0], &step[1]);
        let cost = graph.edge_cost_by_name(u, v)
            .ok_or_else(|| Error::UnknownNode(format!("{u} -> {v}")))?;
        writeln!(
            writer,
            "  {u} -> {v}: +{} (reward), {} (penalty)",
            format_number(cost.reward),
            format_number(cost.penalty),
        )?;
        total = total + cost;
    }
    writeln!(writer)?;
    writeln!(writer, "Sum of rewards: {}", format_number(total.reward))?;
    writeln!(writer, "Sum of penalties: {}", format_number(total.penalty))?;
    Ok(())
}

/// One-paragraph summary of an outcome.
pub fn write_summary(outcome: &Outcome, writer: &mut dyn Write) -> Result<()> {
    match outcome {
        Outcome::Found(p) => {
            writeln!(writer, "Best path: {}", p.path.join(" -> "))?;
            writeln!(writer, "Total reward: {}", format_number(p.total_reward))?;
            writeln!(writer, "Total penalty: {}", format_number(p.total_penalty))?;
            writeln!(writer, "Constraint satisfied: {}", p.constraint_satisfied)?;
        }
        Outcome::Infeasible => {
            writeln!(writer, "No path found that satisfies the constraint.")?;
        }
        Outcome::BudgetExceeded { rounds_completed } => {
            writeln!(writer, "Budget exhausted after {rounds_completed} rounds.")?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON of a solution.
pub fn write_solution_json(solution: &Solution, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, solution)?;
    writeln!(writer)?;
    Ok(())
}

/// Integral values without a trailing `.0`.
fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::graph::loader::{load_csv, RecordFormat};

    fn graph() -> Graph {
        let mut b = GraphBuilder::new();
        b.connect("n0", "n1", EdgeCost::new(5.0, 0.0)).unwrap();
        b.connect("n1", "n2", EdgeCost::new(0.0, 3.5)).unwrap();
        b.build()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_csv_reloads() {
        let g = graph();
        let mut buf = Vec::new();
        export_csv(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("source,target,reward,penalty\n"));
        assert!(text.contains("n1,n2,0,3.5"));

        let (back, report) = load_csv(buf.as_slice(), RecordFormat::Auto).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(back.edge_cost_by_name("n1", "n2"), Some(EdgeCost::new(0.0, 3.5)));
    }

    #[test]
    fn test_path_details() {
        let g = graph();
        let path: Vec<String> = ["n0", "n1", "n2"].iter().map(|s| s.to_string()).collect();
        let mut buf = Vec::new();
        write_path_details(&g, &path, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  n0 -> n1: +5 (reward), 0 (penalty)"));
        assert!(text.contains("Sum of rewards: 5"));
        assert!(text.contains("Sum of penalties: 3.5"));
    }

    #[test]
    fn test_path_details_rejects_non_edge() {
        let g = graph();
        let path: Vec<String> = ["n2", "n0"].iter().map(|s| s.to_string()).collect();
        let mut buf = Vec::new();
        assert!(write_path_details(&g, &path, &mut buf).is_err());
    }

    #[test]
    fn test_solution_json() {
        let solution = Solution { outcome: Outcome::Infeasible, stats: SolveStats::default() };
        let mut buf = Vec::new();
        write_solution_json(&solution, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["outcome"]["status"], "infeasible");
    }
}
