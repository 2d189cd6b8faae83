//! Integration coverage for the Ninja Parser's `parse`/`load_into` split
//! (spec.md §4.3, §9 Open Question 4: a mid-file failure must leave the
//! store untouched).

use ninjagraph::graph::GraphModel;
use ninjagraph::ninja;
use ninjagraph::query::QueryEngine;
use ninjagraph::store::QuadStore;
use std::sync::Arc;

fn open_model() -> (tempfile::TempDir, GraphModel, QueryEngine) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(QuadStore::open(dir.path()).unwrap());
    let model = GraphModel::new(Arc::clone(&store));
    let query = QueryEngine::new(Arc::clone(&store));
    (dir, model, query)
}

#[test]
fn full_file_parses_then_loads_into_the_store() {
    let (_dir, model, query) = open_model();
    let text = "rule cc\n  command = gcc -c $in -o $out\nbuild a.o: cc a.c\nbuild prog: cc a.o\n";

    let parsed = ninja::parse(text).unwrap();
    let stats = ninja::load_into(&model, parsed).unwrap();

    assert_eq!(stats.rules_loaded, 1);
    assert_eq!(stats.builds_loaded, 2);
    assert_eq!(query.get_rule("cc").unwrap().command, "gcc -c $in -o $out");
    assert_eq!(query.get_target("prog").unwrap().build, "build:prog");
}

#[test]
fn parse_failure_never_touches_the_store() {
    let (_dir, _model, query) = open_model();
    // Second rule is missing `command` — the whole parse must fail before
    // anything is handed to the GraphModel.
    let text = "rule cc\n  command = gcc\nrule link\n  description = oops\n";

    assert!(ninja::parse(text).is_err());
    assert!(query.get_rule("cc").is_err());
}

#[test]
fn reloading_the_same_text_is_idempotent() {
    let (_dir, model, query) = open_model();
    let text = "rule cc\n  command = cc\nbuild a.o: cc a.c\n";

    ninja::load_into(&model, ninja::parse(text).unwrap()).unwrap();
    ninja::load_into(&model, ninja::parse(text).unwrap()).unwrap();

    let stats = query.get_build_stats().unwrap();
    assert_eq!(stats.rules, 1);
    assert_eq!(stats.builds, 1);
    assert_eq!(stats.targets, 1);
    assert_eq!(stats.files, 1);
}

#[test]
fn escaped_space_and_continuation_round_trip_through_load() {
    let (_dir, model, query) = open_model();
    let text = "rule cc\n  command = gcc $\n    -O2 $in\nbuild out: cc a\\ b.c\n";

    ninja::load_into(&model, ninja::parse(text).unwrap()).unwrap();

    assert_eq!(query.get_rule("cc").unwrap().command, "gcc -O2 $in");
    let deps: Vec<String> = query.get_build_dependencies("out").unwrap().into_iter().map(|f| f.path).collect();
    assert_eq!(deps, vec!["a b.c".to_string()]);
}
