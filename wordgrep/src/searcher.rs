use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::SearchResult;
use crate::matcher::WordMatcher;
use crate::results::{MatchRecord, MatchWriter};

// Initial buffer size for reading files
const BUFFER_CAPACITY: usize = 8192;

/// One admitted unit of work: an open handle plus its resolved path.
///
/// Owned exclusively by the worker that searches it; the handle is closed
/// when the scan ends, before the worker's limiter slot frees.
#[derive(Debug)]
pub struct FileTask {
    pub path: PathBuf,
    pub file: File,
}

impl FileTask {
    pub fn new(path: PathBuf, file: File) -> Self {
        Self { path, file }
    }

    /// Scans the file line by line, writing a record for every matching
    /// line, and returns how many lines matched.
    ///
    /// Lines are read as raw bytes into a growable buffer until newline or
    /// EOF, then decoded lossily for matching and output, so arbitrarily
    /// long lines and non-UTF-8 content are handled without splitting or
    /// skipping. Line numbering starts at 0. A read error ends this scan
    /// early; it never affects other files.
    pub fn scan<W: Write>(self, matcher: &WordMatcher, sink: &MatchWriter<W>) -> SearchResult<usize> {
        trace!("Scanning file: {}", self.path.display());
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, self.file);
        scan_lines(&mut reader, &self.path, matcher, sink)
    }
}

/// Line-scanning core, split out so tests can drive it from a buffer
pub(crate) fn scan_lines<R: BufRead, W: Write>(
    reader: &mut R,
    path: &Path,
    matcher: &WordMatcher,
    sink: &MatchWriter<W>,
) -> SearchResult<usize> {
    let mut buffer = Vec::with_capacity(256);
    let mut line_number = 0;
    let mut lines_matched = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        if matcher.is_match(&line) {
            trace!("Match at {}:{}", path.display(), line_number);
            sink.write_record(&MatchRecord {
                path,
                line_number,
                line: line.as_ref(),
            })?;
            lines_matched += 1;
        }

        line_number += 1;
    }

    Ok(lines_matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaseMode;
    use std::io::Cursor;

    fn run_scan(content: &[u8], terms: &[&str], case_mode: CaseMode) -> (String, usize) {
        let matcher = WordMatcher::new(terms.iter().map(|t| t.to_string()).collect(), case_mode);
        let sink = MatchWriter::new(Vec::new());
        let mut reader = Cursor::new(content);

        let matched = scan_lines(&mut reader, Path::new("test.txt"), &matcher, &sink).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        (output, matched)
    }

    #[test]
    fn test_scan_reports_matching_lines() {
        let (output, matched) = run_scan(
            b"hello world\nthe cat sat\n",
            &["the", "cat"],
            CaseMode::Insensitive,
        );
        assert_eq!(matched, 1);
        assert_eq!(output, "test.txt:1:the cat sat\n");
    }

    #[test]
    fn test_line_numbers_are_zero_based() {
        let (output, _) = run_scan(b"cat\ndog\ncat\n", &["cat"], CaseMode::Exact);
        assert_eq!(output, "test.txt:0:cat\ntest.txt:2:cat\n");
    }

    #[test]
    fn test_line_reported_once_despite_repeated_terms() {
        let (output, matched) = run_scan(
            b"the cat and the other cat\n",
            &["the", "cat"],
            CaseMode::Insensitive,
        );
        assert_eq!(matched, 1);
        assert_eq!(output, "test.txt:0:the cat and the other cat\n");
    }

    #[test]
    fn test_long_lines_are_not_split() {
        // Well past the initial read buffer capacity
        let mut content = Vec::new();
        content.extend_from_slice("x ".repeat(200).as_bytes());
        content.extend_from_slice(b"needle\nneedle at line one\n");

        let (output, matched) = run_scan(&content, &["needle"], CaseMode::Exact);
        assert_eq!(matched, 2);
        assert!(output.starts_with("test.txt:0:x x"));
        assert!(output.ends_with("test.txt:1:needle at line one\n"));
    }

    #[test]
    fn test_final_line_without_newline() {
        let (output, matched) = run_scan(b"first\ncat at the end", &["cat"], CaseMode::Exact);
        assert_eq!(matched, 1);
        assert_eq!(output, "test.txt:1:cat at the end\n");
    }

    #[test]
    fn test_crlf_line_still_matches() {
        // '\r' is a delimiter, so the word before it tokenizes cleanly
        let (output, matched) = run_scan(b"the cat\r\nno match\r\n", &["cat"], CaseMode::Exact);
        assert_eq!(matched, 1);
        assert_eq!(output, "test.txt:0:the cat\r\n");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let (_, matched) = run_scan(b"\xff\xfe cat \xff\n", &["cat"], CaseMode::Exact);
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_empty_input_matches_nothing() {
        let (output, matched) = run_scan(b"", &["cat"], CaseMode::Insensitive);
        assert_eq!(matched, 0);
        assert!(output.is_empty());
    }
}
