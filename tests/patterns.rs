//! Pattern Tests
//!
//! Regex literals, glob translation and the compiled-pattern cache.

use aeroquery::filter::{
    glob_to_regex, CompiledPattern, FilterCompiler, FilterError, PatternCache, PatternKind,
};
use serde_json::json;

// =============================================================================
// Glob
// =============================================================================

/// "*.md" matches any single non-hidden segment ending in ".md".
#[test]
fn test_star_md() {
    let translated = glob_to_regex("*.md").unwrap();
    assert!(translated.ends_with("\\.md$"));

    let pattern = CompiledPattern::glob("*.md").unwrap();
    assert_eq!(pattern.kind(), PatternKind::Glob);
    assert_eq!(pattern.source(), "*.md");
    assert!(pattern.is_match("readme.md"));
    assert!(!pattern.is_match("docs/readme.md"));
    assert!(!pattern.is_match("readme.mdx"));
}

/// A wildcard never matches a segment that starts with a dot.
#[test]
fn test_hidden_segments_need_literal_dot() {
    let pattern = CompiledPattern::glob("*.md").unwrap();
    assert!(!pattern.is_match(".hidden.md"));
    assert!(!pattern.is_match(".md"));

    let pattern = CompiledPattern::glob("content/**/*.md").unwrap();
    assert!(pattern.is_match("content/blog/post.md"));
    assert!(!pattern.is_match("content/.cache/post.md"));

    let pattern = CompiledPattern::glob(".hidden.md").unwrap();
    assert!(pattern.is_match(".hidden.md"));

    let pattern = CompiledPattern::glob("content/.*/*.md").unwrap();
    assert!(pattern.is_match("content/.cache/post.md"));
}

#[test]
fn test_globstar() {
    let pattern = CompiledPattern::glob("content/**/index.md").unwrap();
    assert!(pattern.is_match("content/index.md"));
    assert!(pattern.is_match("content/blog/2024/index.md"));
    assert!(!pattern.is_match("other/index.md"));
}

#[test]
fn test_classes_and_braces() {
    let pattern = CompiledPattern::glob("img-[0-9]?.{png,jpg}").unwrap();
    assert!(pattern.is_match("img-1a.png"));
    assert!(pattern.is_match("img-7z.jpg"));
    assert!(!pattern.is_match("img-x1.png"));
    assert!(!pattern.is_match("img-1a.gif"));
}

#[test]
fn test_malformed_glob_names_pattern() {
    let err = CompiledPattern::glob("{a,b").unwrap_err();
    assert_eq!(err.pattern(), Some("{a,b"));
    assert!(matches!(err, FilterError::InvalidGlob { .. }));
}

// =============================================================================
// Regex
// =============================================================================

#[test]
fn test_regex_literal_flags() {
    let pattern = CompiledPattern::regex("/^hello world$/i").unwrap();
    assert!(pattern.is_match("Hello World"));

    let plain = CompiledPattern::regex("wor").unwrap();
    assert!(plain.is_match("hello world"));
    assert!(!plain.is_match("WORLD"));
}

#[test]
fn test_malformed_regex_names_pattern() {
    let err = CompiledPattern::regex("/a(/").unwrap_err();
    assert_eq!(err.pattern(), Some("/a(/"));
}

#[test]
fn test_unknown_flag_rejected() {
    assert!(CompiledPattern::regex("/a/q").is_err());
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn test_cache_shared_across_compilations() {
    let cache = PatternCache::new();
    let compiler = FilterCompiler::with_cache(&cache);

    for _ in 0..3 {
        compiler
            .compile(&json!({ "path": { "glob": "**/*.md" }, "title": { "regex": "/x/" } }))
            .unwrap();
    }

    let stats = cache.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 4);
}

#[test]
fn test_cache_keys_by_kind() {
    let cache = PatternCache::new();
    let as_regex = cache.get_or_compile(PatternKind::Regex, "a*").unwrap();
    let as_glob = cache.get_or_compile(PatternKind::Glob, "a*").unwrap();

    assert!(as_regex.is_match("bbb"));
    assert!(!as_glob.is_match("bbb"));
    assert_eq!(cache.len(), 2);
}
