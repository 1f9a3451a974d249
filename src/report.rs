//! Tab-separated comparison report.
//!
//! ```text
//! <key>  L[avg]  R[avg]  L[dev]  R[dev]  L[times]  R[times]
//! ```
//!
//! `L`/`R` are the backend labels. Averages and deviations are whole nanoseconds
//! (truncated), times are the raw samples as `[t1, t2, ..]`. A cell that was not
//! measured prints `skipped` in all three of its columns.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::harness::BenchmarkResult;

/// First column header of size-sweep reports.
pub const SIZE_KEY_HEADER: &str = "Var. count";
/// First column header of corpus reports.
pub const CORPUS_KEY_HEADER: &str = "hash + len";
pub const SKIPPED: &str = "skipped";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Cell {
    Measured(BenchmarkResult),
    Skipped,
}

impl Cell {
    fn avg(&self) -> String {
        match self {
            Cell::Measured(r) => format!("{}", r.mean.trunc() as u64),
            Cell::Skipped => SKIPPED.to_string(),
        }
    }

    fn dev(&self) -> String {
        match self {
            Cell::Measured(r) => format!("{}", r.stddev.trunc() as u64),
            Cell::Skipped => SKIPPED.to_string(),
        }
    }

    fn times(&self) -> String {
        match self {
            Cell::Measured(r) => format!("{:?}", r.samples),
            Cell::Skipped => SKIPPED.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub key: String,
    pub left: Cell,
    pub right: Cell,
}

impl ReportRow {
    pub fn to_tsv(&self) -> String {
        [
            self.key.clone(),
            self.left.avg(),
            self.right.avg(),
            self.left.dev(),
            self.right.dev(),
            self.left.times(),
            self.right.times(),
        ]
        .join("\t")
    }
}

pub fn header(key: &str, left: &str, right: &str) -> String {
    [
        key.to_string(),
        format!("{left}[avg]"),
        format!("{right}[avg]"),
        format!("{left}[dev]"),
        format!("{right}[dev]"),
        format!("{left}[times]"),
        format!("{right}[times]"),
    ]
    .join("\t")
}

/// Streams one report: the header on creation, then one flushed line per row.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(mut out: W, key: &str, left: &str, right: &str) -> Result<Self> {
        writeln!(out, "{}", header(key, left, right))?;
        out.flush()?;
        Ok(ReportWriter { out })
    }

    pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        writeln!(self.out, "{}", row.to_tsv())?;
        self.out.flush()?;
        Ok(())
    }
}
