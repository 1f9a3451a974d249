//! Comparative report driver.
//!
//! Runs one workload on a pair of backends and streams a report row per size (or per
//! corpus expression) as soon as both cells are measured. The first error aborts the
//! report; rows already written stay written.

use std::io::Write;

use crate::backend::{BackendKind, BooleanBackend};
use crate::benches::expressions::CorpusWorkload;
use crate::benches::SizeWorkload;
use crate::corpus::{expression_universe, fingerprint, ExpressionCorpus};
use crate::error::{BenchError, Result};
use crate::harness::{measure, BenchConfig, BenchmarkResult};
use crate::report::{Cell, ReportRow, ReportWriter, CORPUS_KEY_HEADER, SIZE_KEY_HEADER};
use crate::schema::WorkloadReport;
use crate::verify::ParityCheck;
use crate::with_backend;

/// Sizes of one report, strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeSweep {
    sizes: Vec<usize>,
}

impl SizeSweep {
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(BenchError::invalid_input("size sweep is empty"));
        }
        if let Some(pair) = sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(BenchError::invalid_input(format!(
                "size sweep must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        Ok(SizeSweep { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

/// The two backends of a report, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendPair {
    pub left: BackendKind,
    pub right: BackendKind,
}

impl BackendPair {
    pub fn new(left: BackendKind, right: BackendKind) -> Self {
        BackendPair { left, right }
    }
}

struct RowSink<W: Write> {
    writer: ReportWriter<W>,
    report: WorkloadReport,
}

impl<W: Write> RowSink<W> {
    fn new(out: W, key: &str, name: &str, pair: BackendPair, verify: bool) -> Result<Self> {
        let writer = ReportWriter::new(out, key, pair.left.label(), pair.right.label())?;
        Ok(RowSink {
            writer,
            report: WorkloadReport {
                workload: name.to_string(),
                left: pair.left,
                right: pair.right,
                verified_valuations: verify.then(Vec::new),
                rows: Vec::new(),
            },
        })
    }

    fn verified(&mut self, count: usize) {
        if let Some(counts) = self.report.verified_valuations.as_mut() {
            counts.push(count);
        }
    }

    fn emit(&mut self, row: ReportRow) -> Result<()> {
        self.writer.write_row(&row)?;
        self.report.rows.push(row);
        Ok(())
    }
}

fn log_row(name: &str, pair: BackendPair, row: &ReportRow) {
    match (&row.left, &row.right) {
        (Cell::Measured(l), Cell::Measured(r)) => log::info!(
            "{name} {}: {} {:.0} ns, {} {:.0} ns",
            row.key,
            pair.left.label(),
            l.mean,
            pair.right.label(),
            r.mean
        ),
        _ => log::info!("{name} {}: skipped", row.key),
    }
}

fn measure_size<B: BooleanBackend, W: SizeWorkload>(
    cfg: &BenchConfig,
    workload: &W,
    size: usize,
) -> Result<BenchmarkResult> {
    measure(cfg, || workload.instance::<B>(size))
}

/// Run `workload` over `sweep`, one row per size.
///
/// Every size is validated before anything is timed or written.
pub fn run_sweep<W: SizeWorkload, O: Write>(
    cfg: &BenchConfig,
    workload: &W,
    sweep: &SizeSweep,
    pair: BackendPair,
    parity: Option<&ParityCheck>,
    out: O,
) -> Result<WorkloadReport> {
    for &size in sweep.sizes() {
        workload.validate(size)?;
    }
    log::info!(
        "{}: {} vs {} over {:?}",
        workload.name(),
        pair.left.label(),
        pair.right.label(),
        sweep.sizes()
    );

    let mut sink = RowSink::new(out, SIZE_KEY_HEADER, workload.name(), pair, parity.is_some())?;
    for &size in sweep.sizes() {
        if let Some(check) = parity {
            let instance = format!("{} n={size}", workload.name());
            let n = workload.universe(size).len();
            let count = with_backend!(pair.left, L => with_backend!(pair.right, R => {
                let left = workload.instance::<L>(size)?;
                let right = workload.instance::<R>(size)?;
                check.check(cfg, &instance, &left, &right, n)
            }))?;
            sink.verified(count);
        }

        let left = with_backend!(pair.left, B => measure_size::<B, W>(cfg, workload, size))?;
        let right = with_backend!(pair.right, B => measure_size::<B, W>(cfg, workload, size))?;
        let row = ReportRow {
            key: size.to_string(),
            left: Cell::Measured(left),
            right: Cell::Measured(right),
        };
        log_row(workload.name(), pair, &row);
        sink.emit(row)?;
    }
    Ok(sink.report)
}

/// Run a corpus workload, one row per expression in corpus order.
pub fn run_corpus<O: Write>(
    cfg: &BenchConfig,
    workload: &CorpusWorkload,
    corpus: &ExpressionCorpus,
    pair: BackendPair,
    parity: Option<&ParityCheck>,
    out: O,
) -> Result<WorkloadReport> {
    if corpus.is_empty() {
        log::warn!("{}: corpus is empty", workload.name());
    }
    log::info!(
        "{}: {} vs {} over {} expressions",
        workload.name(),
        pair.left.label(),
        pair.right.label(),
        corpus.len()
    );

    let mut sink = RowSink::new(out, CORPUS_KEY_HEADER, workload.name(), pair, parity.is_some())?;
    for expression in corpus.iter() {
        let key = fingerprint(expression);
        let universe = expression_universe(expression)?;

        let row = if workload.skips(expression) {
            with_backend!(pair.left, B => workload.check_parses::<B>(&universe, expression))?;
            with_backend!(pair.right, B => workload.check_parses::<B>(&universe, expression))?;
            log::warn!(
                "{}: {key} not converted, {} characters reach the skip length {}",
                workload.name(),
                expression.chars().count(),
                workload.cnf_skip_len
            );
            ReportRow {
                key,
                left: Cell::Skipped,
                right: Cell::Skipped,
            }
        } else {
            if let Some(check) = parity {
                let count = with_backend!(pair.left, L => with_backend!(pair.right, R => {
                    let left = workload.instance::<L>(&universe, expression)?;
                    let right = workload.instance::<R>(&universe, expression)?;
                    check.check(cfg, &key, &left, &right, universe.len())
                }))?;
                sink.verified(count);
            }
            let left =
                with_backend!(pair.left, B => workload.measure::<B>(cfg, &universe, expression))?;
            let right =
                with_backend!(pair.right, B => workload.measure::<B>(cfg, &universe, expression))?;
            ReportRow {
                key,
                left: Cell::Measured(left),
                right: Cell::Measured(right),
            }
        };
        log_row(workload.name(), pair, &row);
        sink.emit(row)?;
    }
    Ok(sink.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benches::{Monotonicity, RippleCarryAdder, SubstitutionChain};
    use crate::harness::Profile;

    fn quick() -> BenchConfig {
        BenchConfig {
            warmup: Some(0),
            repetitions: Some(2),
            ..BenchConfig::new(Profile::Quick)
        }
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn sweep_must_be_strictly_increasing() {
        assert!(SizeSweep::new(vec![2, 4, 6]).is_ok());
        for bad in [vec![], vec![2, 4, 4], vec![6, 4]] {
            assert!(matches!(
                SizeSweep::new(bad),
                Err(BenchError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn one_row_per_size_in_sweep_order() {
        let mut out = Vec::new();
        let sweep = SizeSweep::new(vec![2, 4, 6]).unwrap();
        let pair = BackendPair::new(BackendKind::Bdd, BackendKind::Expr);
        let report = run_sweep(&quick(), &RippleCarryAdder, &sweep, pair, None, &mut out).unwrap();

        let lines = lines(&out);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Var. count\tBDD[avg]\tExpr[avg]"));
        let keys: Vec<&str> = lines[1..]
            .iter()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(keys, vec!["2", "4", "6"]);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.verified_valuations, None);
        for row in &report.rows {
            match (&row.left, &row.right) {
                (Cell::Measured(l), Cell::Measured(r)) => {
                    assert_eq!(l.samples.len(), 2);
                    assert_eq!(r.samples.len(), 2);
                }
                other => panic!("unexpected cells {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_size_fails_before_anything_is_written() {
        let mut out = Vec::new();
        let sweep = SizeSweep::new(vec![2, 3]).unwrap();
        let pair = BackendPair::new(BackendKind::Bdd, BackendKind::Expr);
        let outcome = run_sweep(&quick(), &RippleCarryAdder, &sweep, pair, None, &mut out);
        assert!(matches!(outcome, Err(BenchError::InvalidInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn verification_counts_valuations() {
        let sweep = SizeSweep::new(vec![1, 2]).unwrap();
        let pair = BackendPair::new(BackendKind::Table, BackendKind::Bdd);
        let check = ParityCheck::default();
        let report = run_sweep(
            &quick(),
            &Monotonicity,
            &sweep,
            pair,
            Some(&check),
            std::io::sink(),
        )
        .unwrap();
        assert_eq!(report.verified_valuations, Some(vec![4, 16]));

        let report = run_sweep(
            &quick(),
            &SubstitutionChain::default(),
            &SizeSweep::new(vec![3]).unwrap(),
            pair,
            Some(&check),
            std::io::sink(),
        )
        .unwrap();
        assert_eq!(report.verified_valuations, Some(vec![8]));
    }

    #[test]
    fn corpus_rows_are_keyed_and_skips_are_explicit() {
        let corpus = ExpressionCorpus::from_lines(["v_a & v_b", "v_a"]);
        let pair = BackendPair::new(BackendKind::Bdd, BackendKind::Expr);
        let mut out = Vec::new();
        let check = ParityCheck::default();
        let report = run_corpus(
            &quick(),
            &CorpusWorkload::cnf(5),
            &corpus,
            pair,
            Some(&check),
            &mut out,
        )
        .unwrap();

        let lines = lines(&out);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("hash + len\t"));
        assert!(lines[1].starts_with(&fingerprint("v_a")));
        assert!(lines[2].starts_with(&fingerprint("v_a & v_b")));
        assert!(lines[2].ends_with("skipped\tskipped"));
        assert_eq!(report.rows[1].left, Cell::Skipped);
        // Skipped rows are not verified.
        assert_eq!(report.verified_valuations, Some(vec![2]));
    }

    #[test]
    fn corpus_error_stops_after_written_rows() {
        let corpus = ExpressionCorpus::from_lines(["v_a & v_b", "v_a", "v_a & ("]);
        let pair = BackendPair::new(BackendKind::Expr, BackendKind::Table);
        let mut out = Vec::new();
        let outcome = run_corpus(
            &quick(),
            &CorpusWorkload::parse(),
            &corpus,
            pair,
            None,
            &mut out,
        );
        // The universe is read with the BDD parser even though neither column is a BDD.
        assert!(matches!(
            outcome,
            Err(BenchError::BackendFailure { backend: "BDD", .. })
        ));
        assert_eq!(lines(&out).len(), 2);
    }
}
