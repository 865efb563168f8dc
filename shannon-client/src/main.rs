//! The requester: reads input lines, dispatches one encoding job per
//! line through the ordered runner, and prints results in original input
//! order. Jobs either compute in-process (`--local`) or each open their
//! own connection to the authority.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shannon_core::{
    ConnectionInfo, EncodeJob, JobOutcome, OrderedJobRunner, request_encoding,
};
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shannon-client")]
#[command(about = "Shannon encoding requester", version)]
struct Args {
    /// Authority host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Authority port.
    #[arg(long, default_value_t = 4321)]
    port: u16,

    /// Read lines from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Encode in-process without contacting an authority.
    #[arg(long)]
    local: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let jobs = read_jobs(args.input.as_deref())?;
    if jobs.is_empty() {
        println!("No input provided.");
        return Ok(());
    }

    debug!(jobs = jobs.len(), local = args.local, "dispatching");
    let (tx, mut rx) = mpsc::channel(jobs.len());
    let runner = if args.local {
        tokio::spawn(OrderedJobRunner::run(
            jobs,
            |job: EncodeJob| async move { job.run() },
            tx,
        ))
    } else {
        let info = ConnectionInfo::new(args.host.clone(), args.port);
        tokio::spawn(OrderedJobRunner::run(
            jobs,
            move |job: EncodeJob| {
                let info = info.clone();
                async move { request_encoding(&info, &job.line).await }
            },
            tx,
        ))
    };

    while let Some(outcome) = rx.recv().await {
        print_outcome(&outcome);
    }
    runner.await??;
    Ok(())
}

fn read_jobs(path: Option<&std::path::Path>) -> Result<Vec<EncodeJob>> {
    match path {
        Some(p) => {
            let file = std::fs::File::open(p)
                .with_context(|| format!("failed to open {}", p.display()))?;
            jobs_from_reader(std::io::BufReader::new(file))
        }
        None => jobs_from_reader(std::io::stdin().lock()),
    }
}

/// Empty lines are skipped before dispatch; each kept line gets the next
/// output slot.
fn jobs_from_reader(reader: impl BufRead) -> Result<Vec<EncodeJob>> {
    let mut jobs = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        if line.is_empty() {
            continue;
        }
        jobs.push(EncodeJob::new(jobs.len(), line));
    }
    Ok(jobs)
}

fn print_outcome(outcome: &JobOutcome) {
    match &outcome.result {
        Ok(encoded) => {
            println!("\nMessage: {}\n\nAlphabet:", outcome.line);
            for entry in encoded.table.entries() {
                println!(
                    "Symbol: {}, Frequency: {}, Shannon code: {}",
                    entry.symbol as char, entry.frequency, entry.code
                );
            }
            println!("\nEncoded message: {}\n", encoded.bits);
        }
        // A failed job keeps its slot with a clearly marked entry.
        Err(e) => {
            println!("\nMessage: {}\n\nError: {e}\n", outcome.line);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
