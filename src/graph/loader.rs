//! CSV edge-list loading.
//!
//! Two record shapes are accepted, each preceded by one header row:
//!
//! ```text
//! source,target,reward,penalty      (two-dimensional)
//! source,target,weight              (one-dimensional, signed)
//! ```
//!
//! A record with the wrong field count or a non-numeric value is skipped,
//! logged, and listed in the `LoadReport`. It never aborts the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::EdgeCost;
use crate::Result;
use super::{Graph, GraphBuilder};

/// Expected record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// `source,target,reward,penalty`
    RewardPenalty,
    /// `source,target,weight`, split by `EdgeCost::from_signed_weight`
    SignedWeight,
    /// Decide from the header's field count.
    #[default]
    Auto,
}

impl RecordFormat {
    fn field_count(self) -> Option<usize> {
        match self {
            RecordFormat::RewardPenalty => Some(4),
            RecordFormat::SignedWeight => Some(3),
            RecordFormat::Auto => None,
        }
    }
}

/// A record the loader dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// 1-based line number in the input.
    pub line: u64,
    pub reason: String,
}

/// What a load produced besides the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub format: RecordFormat,
    pub records_loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Load a graph from any reader.
pub fn load_csv<R: Read>(reader: R, format: RecordFormat) -> Result<(Graph, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let format = match format {
        RecordFormat::Auto => match rdr.headers()?.len() {
            3 => RecordFormat::SignedWeight,
            _ => RecordFormat::RewardPenalty,
        },
        explicit => explicit,
    };
    let expected = format.field_count().unwrap_or(4);

    let mut builder = GraphBuilder::new();
    let mut report = LoadReport { format, ..LoadReport::default() };

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                skip(&mut report, line, e.to_string());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != expected {
            skip(&mut report, line, format!("expected {expected} fields, got {}", record.len()));
            continue;
        }

        let cost = match format {
            RecordFormat::SignedWeight => parse_number(&record[2])
                .map(EdgeCost::from_signed_weight),
            _ => parse_number(&record[2])
                .and_then(|r| parse_number(&record[3]).map(|p| EdgeCost::new(r, p))),
        };
        let cost = match cost {
            Ok(cost) if cost.is_valid() => cost,
            Ok(cost) => {
                let reason = format!("negative or non-finite cost ({}, {})", cost.reward, cost.penalty);
                skip(&mut report, line, reason);
                continue;
            }
            Err(reason) => {
                skip(&mut report, line, reason);
                continue;
            }
        };

        builder.connect(&record[0], &record[1], cost)?;
        report.records_loaded += 1;
    }

    tracing::info!(
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        skipped = report.skipped.len(),
        ?format,
        "graph loaded"
    );

    Ok((builder.build(), report))
}

/// Load a graph from a file on disk.
pub fn load_csv_path(path: impl AsRef<Path>, format: RecordFormat) -> Result<(Graph, LoadReport)> {
    let file = File::open(path.as_ref())?;
    load_csv(file, format)
}

fn parse_number(field: &str) -> std::result::Result<f64, String> {
    field.parse::<f64>()
        .map_err(|_| format!("non-numeric value '{field}'"))
}

fn skip(report: &mut LoadReport, line: u64, reason: String) {
    tracing::warn!(line, %reason, "skipping malformed record");
    report.skipped.push(SkippedRecord { line, reason });
}
