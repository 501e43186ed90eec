// src/store/path.rs

//! Path parsing for store accessors.
//!
//! Supported forms:
//! - `a.b.c` (dot notation)
//! - `a[0].b` / `a.0.b` (array index)
//! - `a[key.with.dots]`, `a["key"]`, `a['k']` (bracketed keys; quoted ones
//!   take backslash escapes)
//!
//! Parsing never fails: every string addresses *some* location. Empty
//! segments are kept, so `a..b` is `a`, `""`, `b` and `c.` is `c`, `""`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// One segment at the start of the input: a bare name or a bracket expression.
static PROP_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[^.\[\]]+|\[(?:([^"'][^\[]*)|"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')\])"#)
        .expect("path regex is valid")
});

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Mapping key.
    Key(String),
    /// Array index (also usable as a mapping key).
    Index(usize),
}

impl Segment {
    fn from_token(token: &str) -> Self {
        match parse_index(token) {
            Some(idx) => Segment::Index(idx),
            None => Segment::Key(token.to_string()),
        }
    }

    /// Index to use when this segment addresses an array element.
    ///
    /// Quoted keys that look like canonical indices (`["2"]`) count as well.
    pub fn array_index(&self) -> Option<usize> {
        match self {
            Segment::Index(idx) => Some(*idx),
            Segment::Key(key) => parse_index(key),
        }
    }

    /// True if a missing container in front of this segment should be an array.
    pub fn is_index(&self) -> bool {
        self.array_index().is_some()
    }

    /// Key to use when this segment addresses a mapping entry.
    pub fn object_key(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(key) => Cow::Borrowed(key.as_str()),
            Segment::Index(idx) => Cow::Owned(idx.to_string()),
        }
    }
}

/// Canonical non-negative integers only: `0`, `7`, `42` but not `07` or `-1`.
fn parse_index(token: &str) -> Option<usize> {
    let canonical = token == "0"
        || (!token.is_empty()
            && !token.starts_with('0')
            && token.bytes().all(|b| b.is_ascii_digit()));
    if canonical { token.parse().ok() } else { None }
}

/// Parse a path string into segments.
///
/// The result is never empty. The empty path is the single empty key, and a
/// leading `.` contributes an empty key as well.
pub fn parse_path(path: &str) -> Vec<Segment> {
    if !path.contains(['.', '[']) {
        return vec![Segment::from_token(path)];
    }

    let mut segments = Vec::new();
    if path.starts_with('.') {
        segments.push(Segment::Key(String::new()));
    }

    let mut pos = 0;
    while let Some(rest) = path.get(pos..).filter(|r| !r.is_empty()) {
        if let Some(caps) = PROP_NAME.captures(rest) {
            if let Some(inner) = caps.get(1) {
                segments.push(Segment::from_token(inner.as_str()));
            } else if let Some(quoted) = caps.get(2).or_else(|| caps.get(3)) {
                segments.push(Segment::Key(unescape(quoted.as_str())));
            } else {
                segments.push(Segment::from_token(&caps[0]));
            }
            pos += caps[0].len();
            continue;
        }

        if empty_segment_at(rest) {
            segments.push(Segment::Key(String::new()));
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if segments.is_empty() {
        // Nothing but stray brackets, e.g. "[".
        segments.push(Segment::Key(String::new()));
    }

    segments
}

/// A separator directly followed by another separator (or the end of the
/// path) encloses an empty key.
fn empty_segment_at(rest: &str) -> bool {
    let after = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix("[]"));
    match after {
        Some(after) => after.is_empty() || after.starts_with('.') || after.starts_with("[]"),
        None => false,
    }
}

fn unescape(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
