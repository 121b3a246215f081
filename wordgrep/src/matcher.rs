use crate::config::CaseMode;

/// Characters that separate words. Fixed, not configurable.
const DELIMITERS: &[char] = &[
    ' ', '\t', '\r', '\n', '.', ',', ':', '?', '!', '`', '(', ')', '[', ']', '-', '/', '\'', '"',
    '<', '>',
];

/// Tests lines for whole-word occurrences of a set of search terms.
///
/// A word is a maximal run of characters outside [`DELIMITERS`]. Terms are
/// compared byte-exact in [`CaseMode::Exact`] mode and ASCII
/// case-insensitively otherwise. A term that appears only as a substring of
/// a longer word (e.g. `the` inside `theme`) never matches.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    terms: Vec<String>,
    case_mode: CaseMode,
}

impl WordMatcher {
    /// Creates a new WordMatcher for the given terms
    pub fn new(terms: Vec<String>, case_mode: CaseMode) -> Self {
        Self { terms, case_mode }
    }

    /// Splits a line into words, in order. Empty runs between adjacent
    /// delimiters are dropped, so an empty line yields no words.
    pub fn words(line: &str) -> impl Iterator<Item = &str> {
        line.split(|c: char| DELIMITERS.contains(&c))
            .filter(|word| !word.is_empty())
    }

    /// Returns true if the line contains at least one term as a whole word.
    ///
    /// Comparison stops at the first matching word, so a line with several
    /// qualifying words or repeated terms still counts once.
    pub fn is_match(&self, line: &str) -> bool {
        Self::words(line).any(|word| self.terms.iter().any(|term| self.word_eq(word, term)))
    }

    fn word_eq(&self, word: &str, term: &str) -> bool {
        match self.case_mode {
            CaseMode::Exact => word == term,
            CaseMode::Insensitive => word.eq_ignore_ascii_case(term),
        }
    }
}
