//! Glob-style filters over fact names and edge kinds
//!
//! `?` matches one character other than `/`, `*` a run of characters other
//! than `/`, and `**` anything at all. Every other character is literal.
//! A filter list selects a name if any of its patterns matches the whole
//! name; an empty list selects nothing.

use super::error::{XrefError, XrefResult};
use dashmap::DashMap;
use regex::{Regex, RegexBuilder};

/// Compiled patterns kept by a [`FilterCache`] before it stops caching
const MAX_CACHED_FILTERS: usize = 4096;

/// Translate a filter pattern into an (unanchored) regex body
pub fn filter_regex_source(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        match c {
            '?' => out.push_str("[^/]"),
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out
}

/// Compile a filter pattern into a regex matching whole names
pub fn compile_filter(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{})$", filter_regex_source(pattern)))
        .dot_matches_new_line(true)
        .build()
}

/// A list of compiled patterns with OR semantics
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Selects nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }
}

/// Concurrent compile-once cache of filter patterns
///
/// Two threads may race to compile the same pattern; both results are
/// identical, so the later insert is harmless.
#[derive(Debug, Default)]
pub struct FilterCache {
    compiled: DashMap<String, Regex>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&self, pattern: &str) -> XrefResult<Regex> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = compile_filter(pattern)
            .map_err(|e| XrefError::InvalidRequest(format!("filter {pattern:?}: {e}")))?;
        if self.compiled.len() < MAX_CACHED_FILTERS {
            self.compiled.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }

    pub fn compile_all(&self, patterns: &[String]) -> XrefResult<PatternSet> {
        let patterns = patterns
            .iter()
            .map(|p| self.compile(p))
            .collect::<XrefResult<Vec<_>>>()?;
        Ok(PatternSet { patterns })
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
