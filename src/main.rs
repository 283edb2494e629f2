use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use regex::Regex;

use lexbench::{corpus, DivergencePolicy, Harness, Lexer, Preprocessor};

#[derive(Parser)]
#[command(about = "Benchmark candidate lexers against a trusted baseline.")]
struct Args {
    /// Baseline lexer; candidate output is checked against its output
    base_lexer: PathBuf,

    /// Candidate lexer executables to benchmark
    #[arg(long, num_args = 1..)]
    lexers: Vec<PathBuf>,

    /// Source files to lex
    #[arg(long, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Folders to scan recursively for source files
    #[arg(long, num_args = 1..)]
    folders: Vec<PathBuf>,

    /// Regex matched against file names found under --folders
    #[arg(long, default_value = ".*")]
    folder_filter: String,

    /// Path of the CSV report
    #[arg(long, default_value = "output.csv")]
    csv_name: PathBuf,

    /// Re-encode sources to plain ascii before lexing
    #[arg(long)]
    normalize: bool,

    /// Abort on the first candidate divergence instead of continuing
    #[arg(long)]
    strict: bool,

    /// Kill a lexer invocation after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let filter = Regex::new(&args.folder_filter).with_context(|| {
        format!("bad folder filter {:?}", args.folder_filter)
    })?;
    let sources = corpus::collect(&args.files, &args.folders, &filter)?;

    let timeout = match args.timeout {
        Some(seconds) if seconds <= 0.0 => {
            bail!("--timeout must be positive")
        }
        Some(seconds) => Some(Duration::from_secs_f64(seconds)),
        None => None,
    };
    let baseline = lexer(args.base_lexer, timeout)?;
    let candidates = args
        .lexers
        .into_iter()
        .map(|path| lexer(path, timeout))
        .collect::<Result<Vec<_>>>()?;

    let preprocessor = if args.normalize {
        Preprocessor::Normalize
    } else {
        Preprocessor::PassThrough
    };
    let policy = if args.strict {
        DivergencePolicy::Strict
    } else {
        DivergencePolicy::Lenient
    };

    let stdout = Rc::new(RefCell::new(io::stdout()));
    let mut harness =
        Harness::new(baseline, candidates, preprocessor, policy, stdout);
    let report = harness.run(&sources)?;

    println!("{}", report);
    report.to_csv_file(&args.csv_name)?;
    info!("wrote {}", args.csv_name.display());
    Ok(())
}

fn lexer(path: PathBuf, timeout: Option<Duration>) -> Result<Lexer> {
    let lexer = Lexer::new(corpus::absolute(&path)?);
    Ok(match timeout {
        Some(limit) => lexer.with_timeout(limit),
        None => lexer,
    })
}
