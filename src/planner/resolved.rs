//! Resolved-field redirection
//!
//! Derived field values are cached on each record under a reserved shadow
//! namespace instead of at their natural path. Filter and sort paths that
//! touch a resolved field are rewritten to read the shadow copy.
//!
//! A path is redirected when:
//! 1. it is exactly a resolved path,
//! 2. a resolved path is a prefix of it and its leaf is an element match, or
//! 3. it is a prefix of a resolved path (an ancestor object).
//!
//! Prefix tests are plain string prefixes, so `foo` counts as a prefix of
//! `foobar`. Overlaps involving array indices are likewise approximate.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::filter::FlatFilter;

/// Dotted paths backed by precomputed values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedFields {
    paths: BTreeSet<String>,
}

impl ResolvedFields {
    /// Flattens a nested resolved-fields map; every non-object value is a
    /// leaf marking its path.
    pub fn from_value(map: &Value) -> Self {
        let mut paths = BTreeSet::new();
        if let Value::Object(_) = map {
            collect_paths(map, &mut Vec::new(), &mut paths);
        }
        Self { paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True if reads of `key` must go to the shadow namespace
    pub fn needs_shadow(&self, key: &str, elem_match: bool) -> bool {
        if self.paths.contains(key) {
            return true;
        }
        if elem_match && self.paths.iter().any(|path| key.starts_with(path.as_str())) {
            return true;
        }
        self.paths.iter().any(|path| path.starts_with(key))
    }

    /// Returns the path reads of `key` should use
    pub fn redirect_path(&self, namespace: &str, key: &str, elem_match: bool) -> String {
        if self.needs_shadow(key, elem_match) {
            format!("{}.{}", namespace, key)
        } else {
            key.to_string()
        }
    }

    /// Rewrites every filter key that touches a resolved field
    pub fn redirect_filter(&self, namespace: &str, filter: FlatFilter) -> FlatFilter {
        if self.is_empty() {
            return filter;
        }

        let mut redirected = FlatFilter::new();
        for (key, leaf) in filter {
            let path = self.redirect_path(namespace, &key, leaf.has_elem_match());
            redirected.insert(path, leaf);
        }
        redirected
    }
}

fn collect_paths(value: &Value, path: &mut Vec<String>, paths: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                collect_paths(child, path, paths);
                path.pop();
            }
        }
        _ => {
            paths.insert(path.join("."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterCompiler, FlatFilter};
    use serde_json::json;

    const NS: &str = "__resolved";

    fn flat(filter: Value) -> FlatFilter {
        FlatFilter::from_node(&FilterCompiler::uncached().compile(&filter).unwrap())
    }

    fn keys(filter: &FlatFilter) -> Vec<&str> {
        filter.paths().collect()
    }

    #[test]
    fn test_flatten_resolved_map() {
        let resolved = ResolvedFields::from_value(&json!({
            "fields": { "slug": true, "readingTime": { "minutes": true } },
            "excerpt": true,
            "empty": {}
        }));
        let paths: Vec<&str> = resolved.paths().collect();
        assert_eq!(
            paths,
            vec!["excerpt", "fields.readingTime.minutes", "fields.slug"]
        );
    }

    #[test]
    fn test_non_object_map_is_empty() {
        assert!(ResolvedFields::from_value(&Value::Null).is_empty());
        assert!(ResolvedFields::from_value(&json!(true)).is_empty());
    }

    #[test]
    fn test_exact_match_redirected() {
        let resolved = ResolvedFields::from_value(&json!({ "fields": { "slug": true } }));
        let filter = resolved.redirect_filter(NS, flat(json!({ "fields": { "slug": { "eq": "/a/" } } })));
        assert_eq!(keys(&filter), vec!["__resolved.fields.slug"]);
    }

    #[test]
    fn test_ancestor_redirected() {
        let resolved = ResolvedFields::from_value(&json!({ "fields": { "slug": true } }));
        let filter = resolved.redirect_filter(NS, flat(json!({ "fields": { "exists": true } })));
        assert_eq!(keys(&filter), vec!["__resolved.fields"]);
    }

    #[test]
    fn test_descendant_redirected_only_for_elem_match() {
        let resolved = ResolvedFields::from_value(&json!({ "authors": true }));

        let filter = resolved.redirect_filter(
            NS,
            flat(json!({ "authors": { "elemMatch": { "name": { "eq": "x" } } } })),
        );
        assert_eq!(keys(&filter), vec!["__resolved.authors"]);

        let filter = resolved.redirect_filter(
            NS,
            flat(json!({ "authors.list": { "elemMatch": { "name": { "eq": "x" } } } })),
        );
        assert_eq!(keys(&filter), vec!["__resolved.authors.list"]);

        let filter = resolved.redirect_filter(NS, flat(json!({ "authors": { "name": { "eq": "x" } } })));
        assert_eq!(keys(&filter), vec!["authors.name"]);
    }

    #[test]
    fn test_unrelated_paths_unchanged() {
        let resolved = ResolvedFields::from_value(&json!({ "fields": { "slug": true } }));
        let filter = resolved.redirect_filter(
            NS,
            flat(json!({ "id": { "eq": "1" }, "frontmatter": { "title": { "eq": "t" } } })),
        );
        assert_eq!(keys(&filter), vec!["frontmatter.title", "id"]);
    }

    #[test]
    fn test_string_prefix_limitation() {
        // `fields` is a string prefix of `fieldset`, so it is redirected
        let resolved = ResolvedFields::from_value(&json!({ "fieldset": true }));
        assert!(resolved.needs_shadow("fields", false));
        assert_eq!(resolved.redirect_path(NS, "fields", false), "__resolved.fields");
    }

    #[test]
    fn test_sort_paths_use_same_test() {
        let resolved = ResolvedFields::from_value(&json!({ "fields": { "date": true } }));
        assert_eq!(resolved.redirect_path(NS, "fields.date", false), "__resolved.fields.date");
        assert_eq!(resolved.redirect_path(NS, "fields.date.year", false), "fields.date.year");
        assert_eq!(resolved.redirect_path(NS, "title", false), "title");
    }
}
