use std::io::Write;
use std::thread;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::errors::SearchResult;
use crate::limiter::Limiter;
use crate::matcher::WordMatcher;
use crate::results::{MatchWriter, RunStats, Summary};
use crate::walker::Walker;

/// Runs a whole-word search under `config.root_path`, writing match lines
/// to `sink` in `path:line_number:line` format (0-based line numbers).
///
/// One control thread walks the tree depth-first while up to
/// `config.max_concurrency` workers search files at the same time. The
/// call returns only after the walk has visited every directory and every
/// worker has finished. The only fatal failures are an invalid
/// configuration and an unlistable root; everything else is logged,
/// counted, and skipped.
pub fn search<W: Write + Send>(config: &SearchConfig, sink: &MatchWriter<W>) -> SearchResult<Summary> {
    config.validate()?;

    info!(
        "Starting search for {:?} under {} (limit {})",
        config.terms,
        config.root_path.display(),
        config.max_concurrency
    );

    let matcher = WordMatcher::new(config.terms.clone(), config.case_mode);
    let limiter = Limiter::new(config.max_concurrency);
    let stats = RunStats::new();
    let walker = Walker::new(&matcher, &limiter, &stats, sink);

    // The scope joins every worker, so the run is done when this returns
    thread::scope(|scope| walker.walk(scope, &config.root_path))?;

    let summary = stats.summary();
    debug!("Peak concurrent searches: {}", summary.peak_concurrency);
    info!(
        "Search complete: {} matching lines in {} files ({} skipped)",
        summary.lines_matched, summary.files_searched, summary.files_skipped
    );

    Ok(summary)
}
