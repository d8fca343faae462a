//! Pattern operators
//!
//! Compiles `regex` and `glob` operands into immutable matchers.
//!
//! - Regex operands use the literal form `/pattern/flags`; a string without
//!   that shape is taken as a bare pattern with no flags.
//! - Glob operands are parsed by `globset` with a literal separator: `*` and
//!   `?` stay inside one path segment, `**` spans segments, `[...]` is a
//!   class and `{a,b}` is an alternation. The anchored regex it produces is
//!   compiled like any other regex operand.
//! - Wildcards never match a segment that starts with `.`; only a pattern
//!   segment written with a literal leading `.` does.
//!
//! Compiled matchers are shared through a process-wide read-through cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use globset::{Glob, GlobBuilder};
use regex::{bytes, Regex, RegexBuilder};

use super::errors::{FilterError, FilterResult};
use crate::observability::{log_event, Event};

/// Source syntax of a pattern operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Regex,
    Glob,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Regex => "regex",
            PatternKind::Glob => "glob",
        }
    }
}

/// A compiled, immutable string matcher
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    kind: PatternKind,
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Text(Arc<Regex>),
    Path(Arc<GlobMatcher>),
}

impl CompiledPattern {
    /// Compiles a pattern without consulting the cache
    pub fn compile(kind: PatternKind, source: &str) -> FilterResult<Self> {
        let matcher = match kind {
            PatternKind::Regex => Matcher::Text(Arc::new(compile_regex_literal(source)?)),
            PatternKind::Glob => Matcher::Path(Arc::new(GlobMatcher::new(source)?)),
        };

        Ok(Self {
            kind,
            source: source.to_string(),
            matcher,
        })
    }

    /// Compiles a regex operand
    pub fn regex(source: &str) -> FilterResult<Self> {
        Self::compile(PatternKind::Regex, source)
    }

    /// Compiles a glob operand
    pub fn glob(source: &str) -> FilterResult<Self> {
        Self::compile(PatternKind::Glob, source)
    }

    /// Syntax the pattern was written in
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Operand as written by the caller
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Regex search for regex operands, whole-path match for globs
    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.matcher {
            Matcher::Text(regex) => regex.is_match(haystack),
            Matcher::Path(glob) => glob.is_match(haystack),
        }
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.source == other.source
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.as_str(), self.source)
    }
}

/// Splits `/body/flags` into its parts; other strings are all body.
fn split_regex_literal(source: &str) -> (&str, &str) {
    if let Some(rest) = source.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            return (&rest[..end], &rest[end + 1..]);
        }
    }
    (source, "")
}

fn compile_regex_literal(source: &str) -> FilterResult<Regex> {
    let (body, flags) = split_regex_literal(source);
    let mut builder = RegexBuilder::new(body);

    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            // Unicode is always on; global and sticky have no meaning for a
            // stateless test.
            'u' | 'g' | 'y' => {}
            other => {
                return Err(FilterError::InvalidRegex {
                    pattern: source.to_string(),
                    reason: format!("unsupported flag '{}'", other),
                })
            }
        }
    }

    builder.build().map_err(|e| FilterError::InvalidRegex {
        pattern: source.to_string(),
        reason: e.to_string(),
    })
}

fn build_glob(glob: &str) -> FilterResult<Glob> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| FilterError::InvalidGlob {
            pattern: glob.to_string(),
            reason: e.kind().to_string(),
        })
}

fn compile_glob_regex(glob: &str) -> FilterResult<bytes::Regex> {
    let parsed = build_glob(glob)?;
    bytes::RegexBuilder::new(parsed.regex())
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| FilterError::InvalidGlob {
            pattern: glob.to_string(),
            reason: e.to_string(),
        })
}

/// Translates a glob into the anchored regex source it is matched with.
pub fn glob_to_regex(glob: &str) -> FilterResult<String> {
    Ok(build_glob(glob)?.regex().to_string())
}

/// A glob plus the pattern segments allowed to match dot-leading segments
#[derive(Debug)]
struct GlobMatcher {
    regex: bytes::Regex,
    /// Index and single-segment matcher of each pattern segment that
    /// starts with a literal `.`
    dot_segments: Vec<(usize, bytes::Regex)>,
    /// Pattern segments line up one-to-one with path segments
    positional: bool,
}

impl GlobMatcher {
    fn new(glob: &str) -> FilterResult<Self> {
        let regex = compile_glob_regex(glob)?;
        let positional = !glob.contains("**") && !glob.contains('{');

        // A segment split out of a brace group may not parse on its own; it
        // then admits nothing.
        let dot_segments = glob
            .split('/')
            .enumerate()
            .filter(|(_, segment)| segment.starts_with('.') || segment.starts_with("\\."))
            .filter_map(|(index, segment)| {
                compile_glob_regex(segment).ok().map(|re| (index, re))
            })
            .collect();

        Ok(Self {
            regex,
            dot_segments,
            positional,
        })
    }

    fn is_match(&self, haystack: &str) -> bool {
        if !self.regex.is_match(haystack.as_bytes()) {
            return false;
        }

        haystack
            .split('/')
            .enumerate()
            .filter(|(_, segment)| segment.starts_with('.'))
            .all(|(index, segment)| {
                if self.positional {
                    self.dot_segments.iter().any(|(i, _)| *i == index)
                } else {
                    self.dot_segments
                        .iter()
                        .any(|(_, re)| re.is_match(segment.as_bytes()))
                }
            })
    }
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Write-once-read-many cache of compiled patterns.
///
/// Entries are never invalidated: a pattern source always compiles to the
/// same matcher. A poisoned lock degrades to uncached compilation.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<(PatternKind, String), CompiledPattern>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PatternCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache
    pub fn global() -> &'static PatternCache {
        static CACHE: OnceLock<PatternCache> = OnceLock::new();
        CACHE.get_or_init(PatternCache::new)
    }

    /// Returns the cached matcher for `source`, compiling it on first use.
    pub fn get_or_compile(&self, kind: PatternKind, source: &str) -> FilterResult<CompiledPattern> {
        let key = (kind, source.to_string());

        if let Ok(entries) = self.entries.read() {
            if let Some(pattern) = entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(pattern.clone());
            }
        }

        let compiled = CompiledPattern::compile(kind, source)?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        log_event(
            Event::PatternCompiled,
            &[("kind", kind.as_str()), ("pattern", source)],
        );

        if let Ok(mut entries) = self.entries.write() {
            entries.entry(key).or_insert_with(|| compiled.clone());
        }

        Ok(compiled)
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> PatternCacheStats {
        PatternCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_literal_with_flags() {
        let p = CompiledPattern::regex("/^hello/i").unwrap();
        assert!(p.is_match("HELLO world"));
        assert!(!p.is_match("say hello"));
    }

    #[test]
    fn test_bare_regex_is_unanchored() {
        let p = CompiledPattern::regex("ell").unwrap();
        assert!(p.is_match("hello"));
        assert!(!p.is_match("HELLO"));
    }

    #[test]
    fn test_regex_body_may_contain_slashes() {
        let p = CompiledPattern::regex("/posts/2020/").unwrap();
        assert!(p.is_match("/blog/posts/2020/hello"));
        assert!(!p.is_match("/blog/posts/2021/hello"));
    }

    #[test]
    fn test_regex_ignored_flags() {
        let p = CompiledPattern::regex("/a+/gu").unwrap();
        assert!(p.is_match("caab"));
    }

    #[test]
    fn test_regex_unknown_flag_rejected() {
        let err = CompiledPattern::regex("/a/q").unwrap_err();
        assert_eq!(err.pattern(), Some("/a/q"));
    }

    #[test]
    fn test_malformed_regex_rejected() {
        let err = CompiledPattern::regex("/(unclosed/").unwrap_err();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));
        assert_eq!(err.pattern(), Some("/(unclosed/"));
    }

    #[test]
    fn test_glob_star_stays_in_segment() {
        let translated = glob_to_regex("*.md").unwrap();
        assert!(translated.contains("[^/]*"));

        let p = CompiledPattern::glob("*.md").unwrap();
        assert!(p.is_match("README.md"));
        assert!(!p.is_match("docs/README.md"));
        assert!(!p.is_match("README.mdx"));
    }

    #[test]
    fn test_glob_wildcards_skip_dot_segments() {
        let p = CompiledPattern::glob("*.md").unwrap();
        assert!(!p.is_match(".md"));
        assert!(!p.is_match(".hidden.md"));

        let p = CompiledPattern::glob("?hidden").unwrap();
        assert!(!p.is_match(".hidden"));

        let p = CompiledPattern::glob("**/*.md").unwrap();
        assert!(p.is_match("a/b/c.md"));
        assert!(!p.is_match("a/.b/c.md"));
        assert!(!p.is_match(".git/c.md"));
    }

    #[test]
    fn test_glob_literal_dot_matches_dot_segments() {
        let p = CompiledPattern::glob(".*.md").unwrap();
        assert!(p.is_match(".hidden.md"));
        assert!(!p.is_match("visible.md"));

        let p = CompiledPattern::glob("docs/.drafts/*.md").unwrap();
        assert!(p.is_match("docs/.drafts/post.md"));
        assert!(!p.is_match("docs/.drafts/.post.md"));

        let p = CompiledPattern::glob("**/.github/*.yml").unwrap();
        assert!(p.is_match("repo/.github/ci.yml"));
    }

    #[test]
    fn test_glob_globstar_spans_segments() {
        let p = CompiledPattern::glob("**/*.md").unwrap();
        assert!(p.is_match("README.md"));
        assert!(p.is_match("a/b/c/README.md"));
        assert!(!p.is_match("a/b/c/README.txt"));

        let p = CompiledPattern::glob("content/**").unwrap();
        assert!(p.is_match("content/blog/post.md"));
        assert!(!p.is_match("static/blog/post.md"));
    }

    #[test]
    fn test_glob_question_and_class() {
        let p = CompiledPattern::glob("file?.[jt]s").unwrap();
        assert!(p.is_match("file1.js"));
        assert!(p.is_match("fileA.ts"));
        assert!(!p.is_match("file12.js"));
        assert!(!p.is_match("file1.rs"));

        let p = CompiledPattern::glob("[!a]*").unwrap();
        assert!(p.is_match("bcd"));
        assert!(!p.is_match("abc"));
    }

    #[test]
    fn test_glob_braces() {
        let p = CompiledPattern::glob("*.{md,mdx}").unwrap();
        assert!(p.is_match("index.md"));
        assert!(p.is_match("index.mdx"));
        assert!(!p.is_match("index.js"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let p = CompiledPattern::glob("a+b(1).txt").unwrap();
        assert!(p.is_match("a+b(1).txt"));
        assert!(!p.is_match("aab1.txt"));
    }

    #[test]
    fn test_glob_unclosed_groups_rejected() {
        let err = CompiledPattern::glob("[abc").unwrap_err();
        assert!(matches!(err, FilterError::InvalidGlob { .. }));
        let err = CompiledPattern::glob("{a,b").unwrap_err();
        assert_eq!(err.pattern(), Some("{a,b"));
    }

    #[test]
    fn test_cache_reuses_compiled_pattern() {
        let cache = PatternCache::new();
        let a = cache.get_or_compile(PatternKind::Glob, "*.md").unwrap();
        let b = cache.get_or_compile(PatternKind::Glob, "*.md").unwrap();
        assert_eq!(a, b);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_cache_separates_kinds() {
        let cache = PatternCache::new();
        let glob = cache.get_or_compile(PatternKind::Glob, "a*").unwrap();
        let regex = cache.get_or_compile(PatternKind::Regex, "a*").unwrap();
        assert_ne!(glob, regex);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let cache = PatternCache::new();
        assert!(cache.get_or_compile(PatternKind::Regex, "/(/").is_err());
        assert!(cache.is_empty());
    }
}
