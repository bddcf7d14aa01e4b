#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use ssq_history::{generate_cmd, stats_cmd, verify_cmd};

#[derive(Parser, Debug)]
#[command(name = "ssq-history")]
#[command(about = "Deterministic synthetic draw-history generator", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set SSQ_HISTORY_LOG)
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a seeded draw history (header + COUNT rows)
    Generate {
        /// Output CSV path [default: ssq_history.csv]
        #[arg(long)]
        output: Option<std::path::PathBuf>,
        /// Number of draws to generate [default: 5000]
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// Random seed [default: 42]
        #[arg(long)]
        seed: Option<u64>,
        /// TOML file with a [generate] table
        #[arg(long)]
        config: Option<std::path::PathBuf>,
        /// Write machine-readable JSON summary to this file
        #[arg(long)]
        json: Option<std::path::PathBuf>,
    },

    /// Append seeded draws to an existing history
    Extend {
        /// History CSV to extend in place
        #[arg(long)]
        input: std::path::PathBuf,
        /// Number of draws to append
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
        /// Random seed for the appended draws
        #[arg(long)]
        seed: u64,
    },

    /// Check a history file against the dataset format
    Verify {
        /// History CSV to check
        #[arg(long)]
        input: std::path::PathBuf,
        /// Write machine-readable JSON report to this file
        #[arg(long)]
        json: Option<std::path::PathBuf>,
    },

    /// Hot/cold number frequencies of a history file
    Stats {
        /// History CSV (comma or tab delimited)
        #[arg(long)]
        input: std::path::PathBuf,
        /// How many hot and cold numbers to list
        #[arg(long, default_value_t = stats_cmd::DEFAULT_TOP)]
        top: usize,
        /// Write machine-readable JSON report to this file
        #[arg(long)]
        json: Option<std::path::PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("SSQ_HISTORY_LOG").unwrap_or_else(|_| {
        if verbose { "ssq_history=debug".to_string() } else { "ssq_history=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { output, count, seed, config, json } => {
            generate_cmd::run(config, output, count, seed, json)
        }
        Commands::Extend { input, count, seed } => generate_cmd::run_extend(input, count, seed),
        Commands::Verify { input, json } => verify_cmd::run(input, json),
        Commands::Stats { input, top, json } => stats_cmd::run(input, top, json),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
