//! Workload replay - CSV operation logs applied to a tree.
//!
//! Each row names an operation and its integer operands:
//!
//! ```text
//! op,key,value,end
//! insert,42,7,
//! get,42,,
//! range,10,,50
//! delete,42,,
//! ```

use std::io;
use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Deserialize;

use crate::comparator::Comparator;
use crate::error::{AvlError, Result};
use crate::tree::AvlTree;

/// One raw CSV row.
#[derive(Debug, Deserialize)]
pub struct WorkloadRow {
    pub op: String,
    pub key: u64,
    pub value: Option<u64>,
    pub end: Option<u64>,
}

/// Kind of operation, used to bucket latency samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Insert,
    Get,
    Delete,
    Floor,
    Ceil,
    Range,
}

impl OpKind {
    pub const ALL: [OpKind; 6] = [
        OpKind::Insert,
        OpKind::Get,
        OpKind::Delete,
        OpKind::Floor,
        OpKind::Ceil,
        OpKind::Range,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            OpKind::Insert => "insert",
            OpKind::Get => "get",
            OpKind::Delete => "delete",
            OpKind::Floor => "floor",
            OpKind::Ceil => "ceil",
            OpKind::Range => "range",
        }
    }
}

/// A typed workload operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert { key: u64, value: u64 },
    Get { key: u64 },
    Delete { key: u64 },
    Floor { key: u64 },
    Ceil { key: u64 },
    Range { min: u64, max: u64 },
}

impl Op {
    pub const fn kind(&self) -> OpKind {
        match self {
            Op::Insert { .. } => OpKind::Insert,
            Op::Get { .. } => OpKind::Get,
            Op::Delete { .. } => OpKind::Delete,
            Op::Floor { .. } => OpKind::Floor,
            Op::Ceil { .. } => OpKind::Ceil,
            Op::Range { .. } => OpKind::Range,
        }
    }

    /// Apply to `tree`, returning the number of entries found or touched.
    ///
    /// An insert rejected by the tree's entry limit touches nothing.
    pub fn apply<C: Comparator<u64>>(&self, tree: &mut AvlTree<u64, u64, C>) -> usize {
        match *self {
            Op::Insert { key, value } => tree.insert(key, value).map_or(0, |_| 1),
            Op::Get { key } => tree.get(&key).map_or(0, |_| 1),
            Op::Delete { key } => tree.delete(&key) as usize,
            Op::Floor { key } => tree.floor(&key).map_or(0, |_| 1),
            Op::Ceil { key } => tree.ceil(&key).map_or(0, |_| 1),
            Op::Range { min, max } => tree.range(&min, &max).len(),
        }
    }
}

impl WorkloadRow {
    /// Convert a raw row to a typed operation.
    ///
    /// `line` is only used to report malformed rows.
    pub fn to_op(&self, line: u64) -> Result<Op> {
        let malformed = |reason: &str| AvlError::MalformedRow {
            line,
            reason: reason.to_string(),
        };

        match self.op.trim().to_ascii_lowercase().as_str() {
            "insert" | "put" => Ok(Op::Insert {
                key: self.key,
                value: self.value.ok_or_else(|| malformed("insert needs a value"))?,
            }),
            "get" => Ok(Op::Get { key: self.key }),
            "delete" | "remove" => Ok(Op::Delete { key: self.key }),
            "floor" => Ok(Op::Floor { key: self.key }),
            "ceil" => Ok(Op::Ceil { key: self.key }),
            "range" => Ok(Op::Range {
                min: self.key,
                max: self.end.ok_or_else(|| malformed("range needs an end"))?,
            }),
            other => Err(malformed(&format!("unknown op {:?}", other))),
        }
    }
}

/// Parse a CSV workload with a header row.
pub fn read_ops<R: io::Read>(reader: R) -> Result<Vec<Op>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ops = Vec::new();
    for (i, row) in csv.deserialize::<WorkloadRow>().enumerate() {
        // Line 1 is the header
        ops.push(row?.to_op(i as u64 + 2)?);
    }
    Ok(ops)
}

// ============================================================================
// Latency Recording
// ============================================================================

/// Per-operation latency histograms (nanoseconds).
pub struct LatencyReport {
    histograms: Vec<(OpKind, Histogram<u64>)>,
    total: Duration,
    ops: u64,
}

impl LatencyReport {
    /// Track values up to 10 ms with 3 significant figures.
    pub fn new() -> Self {
        let histograms = OpKind::ALL
            .iter()
            .map(|&kind| {
                let h = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3)
                    .expect("constant histogram bounds are valid");
                (kind, h)
            })
            .collect();
        Self {
            histograms,
            total: Duration::ZERO,
            ops: 0,
        }
    }

    /// Record one operation's latency.
    pub fn record(&mut self, kind: OpKind, elapsed: Duration) {
        self.total += elapsed;
        self.ops += 1;
        if let Some((_, h)) = self.histograms.iter_mut().find(|(k, _)| *k == kind) {
            // Saturate outliers instead of dropping them
            h.saturating_record(elapsed.as_nanos().max(1) as u64);
        }
    }

    pub fn ops(&self) -> u64 {
        self.ops
    }

    /// Number of samples recorded for `kind`.
    pub fn samples(&self, kind: OpKind) -> u64 {
        self.histograms
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, h)| h.len())
    }

    /// Latency at `quantile` for `kind`, if any samples exist.
    pub fn quantile(&self, kind: OpKind, quantile: f64) -> Option<u64> {
        self.histograms
            .iter()
            .find(|(k, _)| *k == kind)
            .filter(|(_, h)| !h.is_empty())
            .map(|(_, h)| h.value_at_quantile(quantile))
    }

    /// Print a human-readable report to stdout.
    pub fn print(&self) {
        println!("\n=== Latency Report (ns) ===");
        println!("Total Ops:  {}", self.ops);
        if self.total > Duration::ZERO {
            println!(
                "Throughput: {:.2} ops/sec",
                self.ops as f64 / self.total.as_secs_f64()
            );
        }
        println!("---------------------------");
        println!(
            "{:<8} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10}",
            "op", "count", "min", "p50", "p90", "p99", "p99.9", "max"
        );
        for (kind, h) in &self.histograms {
            if h.is_empty() {
                continue;
            }
            println!(
                "{:<8} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10}",
                kind.name(),
                h.len(),
                h.min(),
                h.value_at_quantile(0.50),
                h.value_at_quantile(0.90),
                h.value_at_quantile(0.99),
                h.value_at_quantile(0.999),
                h.max()
            );
        }
        println!("---------------------------");
    }
}

impl Default for LatencyReport {
    fn default() -> Self {
        Self::new()
    }
}
