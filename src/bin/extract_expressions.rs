use boolfn_bench::corpus::{extract_expressions, DEFAULT_MIN_LEN, DEFAULT_MODEL_EXTENSION};
use boolfn_bench::error::Result;
use clap::Parser;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, Write};
use std::path::PathBuf;

/// Print the long update functions of every model in a directory, one per line.
#[derive(Parser, Debug)]
#[command(name = "extract-expressions")]
struct Args {
    /// Directory with the model files.
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Only update functions longer than this many characters are printed.
    #[arg(long, default_value_t = DEFAULT_MIN_LEN)]
    min_len: usize,

    /// Extension of the model files.
    #[arg(long, default_value = DEFAULT_MODEL_EXTENSION)]
    extension: String,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let expressions = extract_expressions(&args.dir, &args.extension, args.min_len)?;
    log::info!(
        "{} expressions from {}",
        expressions.len(),
        args.dir.display()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for expression in expressions {
        writeln!(out, "{expression}")?;
    }
    out.flush()?;
    Ok(())
}
