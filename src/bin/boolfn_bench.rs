use boolfn_bench::backend::BackendKind;
use boolfn_bench::benches::expressions::{CorpusWorkload, DEFAULT_CNF_SKIP_LEN};
use boolfn_bench::benches::{
    Monotonicity, RippleCarryAdder, SizeWorkload, SubstitutionChain, SubstitutionStart,
};
use boolfn_bench::corpus::{load_expressions, ExpressionCorpus};
use boolfn_bench::driver::{run_corpus, run_sweep, BackendPair, SizeSweep};
use boolfn_bench::error::Result;
use boolfn_bench::harness::{BenchConfig, Profile};
use boolfn_bench::schema::{BenchRunReport, RunMeta, WorkloadReport};
use boolfn_bench::verify::{ParityCheck, DEFAULT_VERIFY_SAMPLES};
use boolfn_bench::Workload;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Standard,
    Quick,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Standard => Profile::Standard,
            ProfileArg::Quick => Profile::Quick,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
struct SweepArgs {
    /// Comma-separated sizes replacing the default sweep (strictly increasing).
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,
}

#[derive(ClapArgs, Debug, Clone)]
struct CorpusArgs {
    /// Expression corpus, one expression per line.
    #[arg(long, value_name = "FILE", default_value = "data/expressions.txt")]
    corpus: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ripple-carry adder over 2, 4, .., 38 variables.
    Adder {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Monotonic functions of arity 1..=5.
    Monotonicity {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Substitution chain over 2..=19 variables.
    Substitution {
        #[command(flatten)]
        sweep: SweepArgs,

        #[arg(long, value_enum, default_value_t = SubstitutionStart::Single)]
        start: SubstitutionStart,
    },

    /// Parse every corpus expression.
    ExprParse {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Convert every corpus expression to CNF.
    ExprCnf {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Expressions with at least this many characters are reported as skipped.
        #[arg(long, default_value_t = DEFAULT_CNF_SKIP_LEN)]
        cnf_skip_len: usize,
    },

    /// Run every workload with its default sweep.
    Suite {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[arg(long, default_value_t = DEFAULT_CNF_SKIP_LEN)]
        cnf_skip_len: usize,

        #[arg(long, value_enum, default_value_t = SubstitutionStart::Single)]
        start: SubstitutionStart,
    },
}

#[derive(Parser, Debug)]
#[command(name = "boolfn-bench")]
#[command(about = "Comparative Boolean-function backend benchmarks (TSV on stdout)")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Standard, global = true)]
    profile: ProfileArg,

    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Untimed calls before measuring (overrides the profile).
    #[arg(long, global = true)]
    warmup: Option<usize>,

    /// Timed calls per cell (overrides the profile).
    #[arg(long, global = true)]
    repetitions: Option<usize>,

    /// Backend of the left columns (default depends on the workload).
    #[arg(long, value_enum, global = true)]
    left: Option<BackendKind>,

    /// Backend of the right columns (default depends on the workload).
    #[arg(long, value_enum, global = true)]
    right: Option<BackendKind>,

    /// Check that both backends compute the same function before timing each row.
    #[arg(long, default_value_t = false, global = true)]
    verify: bool,

    /// Random valuations per row when the universe is too large to enumerate.
    #[arg(long, default_value_t = DEFAULT_VERIFY_SAMPLES, global = true)]
    verify_samples: usize,

    /// Also write a JSON run report to this file.
    #[arg(long, value_name = "FILE", global = true)]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info, global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    cmd: Command,
}

struct Runner {
    cfg: BenchConfig,
    parity: Option<ParityCheck>,
    left: Option<BackendKind>,
    right: Option<BackendKind>,
}

impl Runner {
    fn pair(&self, workload: Workload) -> BackendPair {
        let (left, right) = workload.default_backends();
        BackendPair::new(self.left.unwrap_or(left), self.right.unwrap_or(right))
    }

    fn sweep<W: SizeWorkload>(
        &self,
        kind: Workload,
        workload: &W,
        sizes: Option<Vec<usize>>,
    ) -> Result<WorkloadReport> {
        let sweep = SizeSweep::new(sizes.unwrap_or_else(|| workload.default_sizes()))?;
        let stdout = io::stdout();
        run_sweep(
            &self.cfg,
            workload,
            &sweep,
            self.pair(kind),
            self.parity.as_ref(),
            stdout.lock(),
        )
    }

    fn corpus(
        &self,
        kind: Workload,
        workload: &CorpusWorkload,
        corpus: &ExpressionCorpus,
    ) -> Result<WorkloadReport> {
        let stdout = io::stdout();
        run_corpus(
            &self.cfg,
            workload,
            corpus,
            self.pair(kind),
            self.parity.as_ref(),
            stdout.lock(),
        )
    }
}

fn now_utc() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn load_corpus(args: &CorpusArgs) -> Result<ExpressionCorpus> {
    let corpus = load_expressions(&args.corpus)?;
    log::info!(
        "loaded {} expressions from {}",
        corpus.len(),
        args.corpus.display()
    );
    Ok(corpus)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Reports go to stdout, so logging stays on stderr.
    TermLogger::init(
        args.log_level,
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let cfg = BenchConfig {
        profile: args.profile.into(),
        seed: args.seed,
        warmup: args.warmup,
        repetitions: args.repetitions,
    };
    log::debug!(
        "profile {} ({} warmup, {} repetitions), seed {}",
        cfg.profile.as_str(),
        cfg.warmup_iters(),
        cfg.repetitions(),
        cfg.seed
    );
    let runner = Runner {
        cfg,
        parity: args.verify.then(|| ParityCheck::new(args.verify_samples)),
        left: args.left,
        right: args.right,
    };

    let mut workloads = Vec::new();
    match args.cmd {
        Command::Adder { sweep } => {
            workloads.push(runner.sweep(Workload::Adder, &RippleCarryAdder, sweep.sizes)?);
        }
        Command::Monotonicity { sweep } => {
            workloads.push(runner.sweep(Workload::Monotonicity, &Monotonicity, sweep.sizes)?);
        }
        Command::Substitution { sweep, start } => {
            workloads.push(runner.sweep(
                Workload::Substitution,
                &SubstitutionChain::new(start),
                sweep.sizes,
            )?);
        }
        Command::ExprParse { corpus } => {
            let corpus = load_corpus(&corpus)?;
            workloads.push(runner.corpus(Workload::ExprParse, &CorpusWorkload::parse(), &corpus)?);
        }
        Command::ExprCnf {
            corpus,
            cnf_skip_len,
        } => {
            let corpus = load_corpus(&corpus)?;
            workloads.push(runner.corpus(
                Workload::ExprCnf,
                &CorpusWorkload::cnf(cnf_skip_len),
                &corpus,
            )?);
        }
        Command::Suite {
            corpus,
            cnf_skip_len,
            start,
        } => {
            let corpus = load_corpus(&corpus)?;
            for (i, kind) in Workload::ALL.into_iter().enumerate() {
                if i > 0 {
                    // Blank line between reports.
                    println!();
                }
                let report = match kind {
                    Workload::Adder => runner.sweep(kind, &RippleCarryAdder, None)?,
                    Workload::Monotonicity => runner.sweep(kind, &Monotonicity, None)?,
                    Workload::Substitution => {
                        runner.sweep(kind, &SubstitutionChain::new(start), None)?
                    }
                    Workload::ExprParse => {
                        runner.corpus(kind, &CorpusWorkload::parse(), &corpus)?
                    }
                    Workload::ExprCnf => {
                        runner.corpus(kind, &CorpusWorkload::cnf(cnf_skip_len), &corpus)?
                    }
                };
                workloads.push(report);
            }
        }
    }
    io::stdout().flush()?;

    if let Some(out) = args.out {
        let report = BenchRunReport {
            run: RunMeta::new(&runner.cfg, now_utc(), git_sha_short()),
            workloads,
        };
        fs::write(&out, serde_json::to_string_pretty(&report)?)?;
        log::info!("wrote run report to {}", out.display());
    }

    Ok(())
}
