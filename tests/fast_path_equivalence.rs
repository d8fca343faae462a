//! Fast Path Equivalence Tests
//!
//! A first-only query that is exactly `id eq <string>` is answered by a
//! direct identifier lookup. The answer must equal what a full scan over
//! the same records returns, for hits, misses and type mismatches alike.

use aeroquery::config::QueryConfig;
use aeroquery::executor::QueryExecutor;
use aeroquery::planner::{QueryArgs, ScanType};
use aeroquery::store::MemoryStore;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn fixture() -> Vec<Value> {
    vec![
        json!({ "id": "post-1", "title": "One", "internal": { "type": "Post" } }),
        json!({ "id": "post-2", "title": "Two", "internal": { "type": "Post" } }),
        json!({ "id": "page-1", "title": "About", "internal": { "type": "Page" } }),
        json!({ "id": "orphan", "title": "No type" }),
    ]
}

fn scan_config() -> QueryConfig {
    QueryConfig {
        fast_path: false,
        ..QueryConfig::default()
    }
}

/// Runs the same query with and without the fast path
fn both_ways(args: &QueryArgs) -> (Option<Vec<Value>>, Option<Vec<Value>>) {
    let fast_config = QueryConfig::default();
    let slow_config = scan_config();
    let store = MemoryStore::with_records(&fast_config, fixture()).unwrap();

    let fast = QueryExecutor::new(&store, &fast_config).execute(args).unwrap();
    assert!(matches!(fast.scan_type, ScanType::IdLookup(_)));

    let slow = QueryExecutor::new(&store, &slow_config).execute(args).unwrap();
    assert_eq!(slow.scan_type, ScanType::FullScan);

    (fast.into_records(), slow.into_records())
}

fn id_query(id: &str, types: &[&str]) -> QueryArgs {
    QueryArgs::new(types.iter().copied())
        .with_filter(json!({ "id": { "eq": id } }))
        .first_only()
}

// =============================================================================
// Equivalence
// =============================================================================

#[test]
fn test_hit_equivalent() {
    let (fast, slow) = both_ways(&id_query("post-2", &["Post"]));
    assert_eq!(fast, slow);
    assert_eq!(fast.unwrap()[0]["title"], "Two");
}

#[test]
fn test_missing_id_equivalent() {
    let (fast, slow) = both_ways(&id_query("post-9", &["Post"]));
    assert_eq!(fast, slow);
    assert_eq!(fast, Some(vec![]));
}

#[test]
fn test_type_mismatch_equivalent() {
    let (fast, slow) = both_ways(&id_query("page-1", &["Post"]));
    assert_eq!(fast, slow);
    assert_eq!(fast, Some(vec![]));
}

#[test]
fn test_multiple_types_equivalent() {
    let (fast, slow) = both_ways(&id_query("page-1", &["Post", "Page"]));
    assert_eq!(fast, slow);
    assert_eq!(fast.unwrap().len(), 1);
}

#[test]
fn test_untyped_record_equivalent() {
    let (fast, slow) = both_ways(&id_query("orphan", &["Post"]));
    assert_eq!(fast, slow);
    assert_eq!(fast, Some(vec![]));
}

#[test]
fn test_every_id_equivalent() {
    for record in fixture() {
        let id = record["id"].as_str().unwrap();
        for types in [&["Post"][..], &["Page"][..], &["Page", "Post"][..]] {
            let (fast, slow) = both_ways(&id_query(id, types));
            assert_eq!(fast, slow, "id {} types {:?}", id, types);
        }
    }
}

// =============================================================================
// Fast Path Not Taken
// =============================================================================

/// All-matches mode never uses the identifier lookup.
#[test]
fn test_all_mode_scans() {
    let config = QueryConfig::default();
    let store = MemoryStore::with_records(&config, fixture()).unwrap();
    let args = QueryArgs::new(["Post"]).with_filter(json!({ "id": { "eq": "post-1" } }));

    let output = QueryExecutor::new(&store, &config).execute(&args).unwrap();
    assert_eq!(output.scan_type, ScanType::FullScan);
    assert_eq!(output.len(), 1);
}

/// Extra constraints force a scan, which still honors them.
#[test]
fn test_extra_constraint_scans() {
    let config = QueryConfig::default();
    let store = MemoryStore::with_records(&config, fixture()).unwrap();
    let args = QueryArgs::new(["Post"])
        .with_filter(json!({ "id": { "eq": "post-1" }, "title": { "eq": "Two" } }))
        .first_only();

    let output = QueryExecutor::new(&store, &config).execute(&args).unwrap();
    assert_eq!(output.scan_type, ScanType::FullScan);
    assert!(output.is_empty());
}

/// A custom id field drives the lookup decision.
#[test]
fn test_custom_id_field() {
    let config = QueryConfig {
        id_field: "slug".into(),
        ..QueryConfig::default()
    };
    let store = MemoryStore::with_records(
        &config,
        vec![json!({ "slug": "hello", "internal": { "type": "Post" } })],
    )
    .unwrap();

    let args = QueryArgs::new(["Post"])
        .with_filter(json!({ "slug": { "eq": "hello" } }))
        .first_only();
    let output = QueryExecutor::new(&store, &config).execute(&args).unwrap();
    assert_eq!(output.scan_type, ScanType::IdLookup("hello".into()));
    assert_eq!(output.len(), 1);
}

// =============================================================================
// Supplied Records
// =============================================================================

/// An identifier lookup over supplied records finds them even when the
/// store is empty.
#[test]
fn test_supplied_records_equivalent() {
    let fast_config = QueryConfig::default();
    let slow_config = scan_config();
    let store = MemoryStore::new(&fast_config);
    let supplied = vec![json!({ "id": "a", "internal": { "type": "T" } })];
    let args = id_query("a", &["T"]);

    let fast = QueryExecutor::new(&store, &fast_config)
        .execute_on_records(supplied.clone(), &args)
        .unwrap();
    assert!(matches!(fast.scan_type, ScanType::IdLookup(_)));

    let slow = QueryExecutor::new(&store, &slow_config)
        .execute_on_records(supplied.clone(), &args)
        .unwrap();
    assert_eq!(slow.scan_type, ScanType::FullScan);

    assert_eq!(fast.into_records(), Some(supplied.clone()));
    assert_eq!(slow.into_records(), Some(supplied));
}
