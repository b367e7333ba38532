use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lagrange_rs::output::{render, render_batch, BatchEntry, Format, Report};
use lagrange_rs::{
    recover, recover_batch, LagrangeError, Mode, ShareSet, MAX_BASE, MIN_BASE, SAMPLE_SHARE_SET, SSS,
};
use num_bigint::BigInt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lagrange-rs")]
#[command(about = "Recover a polynomial or its secret from threshold shares", long_about = None)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpolate share sets read from files, or from stdin
    Recover(RecoverArgs),
    /// Deal shares of a secret as a share set
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct RecoverArgs {
    /// Share set files; several files are recovered independently
    files: Vec<PathBuf>,

    /// Print only the value at x = 0
    #[arg(short, long)]
    secret_only: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Secret to share
    #[arg(long)]
    secret: String,

    /// Base the secret is written in
    #[arg(long, default_value_t = 10, value_parser = base_in_range)]
    secret_base: u32,

    /// Threshold (k)
    #[arg(short = 'k', long)]
    threshold: usize,

    /// Number of shares (n)
    #[arg(short = 'n', long)]
    num_shares: usize,

    /// Base the share values are written in
    #[arg(short, long, default_value_t = 10, value_parser = base_in_range)]
    base: u32,

    /// Bit size of the random coefficients
    #[arg(long, default_value_t = 64)]
    bits: u64,
}

fn base_in_range(s: &str) -> std::result::Result<u32, String> {
    let base: u32 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(base)
    } else {
        Err(format!("base must be in {MIN_BASE}..={MAX_BASE}"))
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    if input.trim().is_empty() {
        info!("no input on stdin, using the built-in sample share set");
        return Ok(SAMPLE_SHARE_SET.to_string());
    }
    Ok(input)
}

fn run_recover(args: RecoverArgs) -> Result<bool> {
    let mode = if args.secret_only {
        Mode::Secret
    } else {
        Mode::Polynomial
    };

    if args.files.is_empty() {
        let set = ShareSet::from_json(&read_stdin()?).context("failed to parse stdin")?;
        let recovery = recover(&set, mode)?;
        println!("{}", render(&Report::from(&recovery), args.format)?);
        return Ok(true);
    }

    let inputs = args.files.iter().map(|path| {
        fs::read_to_string(path)
            .map_err(LagrangeError::from)
            .and_then(|text| ShareSet::from_json(&text))
    });
    let entries: Vec<BatchEntry> = recover_batch(inputs, mode)
        .iter()
        .zip(&args.files)
        .map(|(result, path)| BatchEntry::new(path.display().to_string(), result))
        .collect();

    println!("{}", render_batch(&entries, args.format)?);
    Ok(entries.iter().all(BatchEntry::is_ok))
}

fn run_split(args: SplitArgs) -> Result<()> {
    let secret = BigInt::parse_bytes(args.secret.as_bytes(), args.secret_base)
        .with_context(|| format!("{:?} is not a base-{} number", args.secret, args.secret_base))?;
    let sss = SSS::create(
        &secret,
        args.threshold,
        args.num_shares,
        args.bits,
        &mut rand::thread_rng(),
    )?;
    println!("{}", sss.to_share_set(args.base)?.to_json_pretty()?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Recover(args) => run_recover(args),
        Command::Split(args) => run_split(args).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
