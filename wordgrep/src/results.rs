use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A single reported line.
///
/// Records are produced by a file searcher and written to the shared sink
/// immediately; they are never stored. Line numbers are 0-based: the first
/// line of a file is line 0.
#[derive(Debug, Clone, Copy)]
pub struct MatchRecord<'a> {
    /// Path of the file containing the match
    pub path: &'a Path,
    /// 0-based line number of the match
    pub line_number: usize,
    /// The raw line text, including its trailing newline when present
    pub line: &'a str,
}

/// Shared output sink for match lines.
///
/// Workers from different files write concurrently; each record is
/// formatted up front and written with a single `write_all` under the lock,
/// so output is indivisible at line granularity. Interleaving across files
/// is possible and acceptable; within one file, records arrive in ascending
/// line order.
#[derive(Debug)]
pub struct MatchWriter<W: Write> {
    inner: Mutex<W>,
}

impl<W: Write> MatchWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Writes one match line in `path:line_number:raw_line` format
    pub fn write_record(&self, record: &MatchRecord<'_>) -> io::Result<()> {
        let mut formatted = String::with_capacity(record.line.len() + 16);
        formatted.push_str(&record.path.display().to_string());
        formatted.push(':');
        formatted.push_str(&record.line_number.to_string());
        formatted.push(':');
        formatted.push_str(record.line);
        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }

        let mut writer = self.inner.lock().expect("sink lock poisoned");
        writer.write_all(formatted.as_bytes())
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.inner.into_inner().expect("sink lock poisoned")
    }
}

/// Live counters for one search run, shared across the walk thread and all
/// workers.
#[derive(Debug, Default)]
pub struct RunStats {
    files_searched: AtomicUsize,
    files_skipped: AtomicUsize,
    lines_matched: AtomicUsize,
    read_errors: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Called by the walk thread once a slot is held and the file is open
    pub fn task_started(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    /// Called by a worker when its scan ends, however it ends
    pub fn task_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Records a completed scan and the matching lines it emitted
    pub fn record_scan(&self, lines_matched: usize) {
        self.files_searched.fetch_add(1, Ordering::Relaxed);
        self.lines_matched.fetch_add(lines_matched, Ordering::Relaxed);
    }

    /// Records a scan cut short by a read or write error
    pub fn record_read_error(&self) {
        self.files_searched.fetch_add(1, Ordering::Relaxed);
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an entry that could not be opened or classified
    pub fn record_skip(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the counters, taken after all workers have finished
    pub fn summary(&self) -> Summary {
        Summary {
            files_searched: self.files_searched.load(Ordering::SeqCst),
            files_skipped: self.files_skipped.load(Ordering::SeqCst),
            lines_matched: self.lines_matched.load(Ordering::SeqCst),
            read_errors: self.read_errors.load(Ordering::SeqCst),
            peak_concurrency: self.peak_in_flight.load(Ordering::SeqCst),
        }
    }
}

/// Final statistics for a completed search run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files whose scan ran, including those cut short by a read error
    pub files_searched: usize,
    /// Entries skipped because they could not be opened or classified
    pub files_skipped: usize,
    /// Total matching lines written to the sink
    pub lines_matched: usize,
    /// Scans that ended early on a read or write error
    pub read_errors: usize,
    /// Highest number of file searches observed running at once
    pub peak_concurrency: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_write_record_format() {
        let sink = MatchWriter::new(Vec::new());
        sink.write_record(&MatchRecord {
            path: Path::new("a.txt"),
            line_number: 1,
            line: "the cat sat\n",
        })
        .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "a.txt:1:the cat sat\n");
    }

    #[test]
    fn test_write_record_supplies_missing_newline() {
        let sink = MatchWriter::new(Vec::new());
        sink.write_record(&MatchRecord {
            path: Path::new("a.txt"),
            line_number: 0,
            line: "no trailing newline",
        })
        .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "a.txt:0:no trailing newline\n");
    }

    #[test]
    fn test_stats_counters() {
        let stats = RunStats::new();
        stats.task_started();
        stats.task_started();
        stats.task_finished();
        stats.record_scan(3);
        stats.record_scan(0);
        stats.record_read_error();
        stats.record_skip();
        stats.task_finished();

        let summary = stats.summary();
        assert_eq!(summary.files_searched, 3);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.lines_matched, 3);
        assert_eq!(summary.read_errors, 1);
        assert_eq!(summary.peak_concurrency, 2);
    }
}
