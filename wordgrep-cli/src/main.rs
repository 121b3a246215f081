use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wordgrep::{search, CaseMode, MatchWriter, SearchConfig};

/// Recursively search for whole-word matches, like grep -Rnw
#[derive(Parser)]
#[command(name = "wordgrep", author, version, about, long_about = None)]
struct Cli {
    /// Start directory for the search
    #[arg(short = 'd', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Match terms exactly (case-sensitive)
    #[arg(short = 'e', long = "exact")]
    exact: bool,

    /// Maximum number of files searched concurrently (default: CPU cores)
    #[arg(short = 't', long = "threads")]
    threads: Option<NonZeroUsize>,

    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search terms, matched as whole words
    #[arg(value_name = "TERM")]
    terms: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_config = SearchConfig {
        terms: cli.terms,
        root_path: cli.dir,
        case_mode: if cli.exact {
            CaseMode::Exact
        } else {
            CaseMode::Insensitive
        },
        max_concurrency: cli
            .threads
            .unwrap_or_else(|| NonZeroUsize::new(num_cpus::get().max(1)).unwrap()),
        ..SearchConfig::default()
    };

    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli_config);

    init_logging(&config.log_level);
    tracing::debug!(
        "Searching {} for {:?} with limit {}",
        config.root_path.display(),
        config.terms,
        config.max_concurrency
    );

    let sink = MatchWriter::new(io::stdout());
    let summary = search(&config, &sink)?;

    // Matches go to stdout; keep the summary on stderr
    let mut report = format!(
        "Found {} matching lines in {} files",
        summary.lines_matched, summary.files_searched
    );
    if summary.files_skipped > 0 || summary.read_errors > 0 {
        report.push_str(&format!(
            " ({} skipped, {} read errors)",
            summary.files_skipped, summary.read_errors
        ));
    }
    eprintln!("{}", report.cyan());

    Ok(())
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
