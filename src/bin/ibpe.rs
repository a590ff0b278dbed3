use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use ibpe::status;
use ibpe::{IbpeError, Trainer, TrainerConfig};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Incremental BPE vocabulary trainer", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a vocabulary from raw input files
    Train(TrainArgs),
    /// Print a JSON snapshot of a vocabulary file
    Status(StatusArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Project label echoed in log output
    project: String,

    /// Target vocabulary size, including the 256 base byte tokens
    vocab_size: u16,

    /// Path of the vocabulary file to write
    vocab_path: PathBuf,

    /// Input files to train on
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Disable per-pass logging and the progress spinner
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Vocabulary file to inspect
    vocab_path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalized_args());
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Status(args) => run_status(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Mode selection is case-insensitive: lowercase the first subcommand token
/// so `TRAIN` and `Status` both parse.
fn normalized_args() -> Vec<OsString> {
    let mut args: Vec<OsString> = env::args_os().collect();
    for arg in args.iter_mut().skip(1) {
        let Some(text) = arg.to_str() else {
            break;
        };
        if text.starts_with('-') {
            continue;
        }
        if text.eq_ignore_ascii_case("train") || text.eq_ignore_ascii_case("status") {
            *arg = OsString::from(text.to_ascii_lowercase());
        }
        break;
    }
    args
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<IbpeError>()
        .map_or(1, IbpeError::exit_code)
}

fn run_train(args: TrainArgs) -> Result<()> {
    let cfg = TrainerConfig {
        target_vocab_size: args.vocab_size,
        show_progress: !args.no_progress,
    };

    info!(
        "training project {} into {} from {} input file(s)",
        args.project,
        args.vocab_path.display(),
        args.inputs.len()
    );

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} training merges... {elapsed}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(cfg);
    let artifacts = trainer
        .train(&args.vocab_path, &args.inputs)
        .with_context(|| format!("training failed for project {}", args.project))?;
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }

    info!("stop reason: {:?}", artifacts.metrics.stop_reason);
    println!(
        "wrote {} merge rules (vocabulary size {}) to {} in {:.2?}",
        artifacts.rules.len(),
        256 + artifacts.rules.len(),
        args.vocab_path.display(),
        artifacts.metrics.total_duration
    );

    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    let snapshot = status::read_snapshot(&args.vocab_path).with_context(|| {
        format!(
            "failed to read vocabulary file {}",
            args.vocab_path.display()
        )
    })?;
    println!("{}", snapshot.to_json()?);
    Ok(())
}
