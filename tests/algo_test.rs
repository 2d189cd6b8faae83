//! Integration coverage for the Graph Algorithms (spec.md §4.5, §8).

use ninjagraph::algo;
use ninjagraph::graph::{BuildInput, GraphModel, Rule};
use ninjagraph::query::QueryEngine;
use ninjagraph::store::QuadStore;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

fn open_model() -> (TempDir, GraphModel, QueryEngine) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(QuadStore::open(dir.path()).unwrap());
    let model = GraphModel::new(Arc::clone(&store));
    let query = QueryEngine::new(Arc::clone(&store));
    (dir, model, query)
}

fn rule(name: &str) -> Rule {
    Rule {
        name: name.to_string(),
        command: "cc".to_string(),
        description: String::new(),
        variables: HashMap::new(),
    }
}

fn build(id: &str, rule_name: &str) -> BuildInput {
    BuildInput {
        build_id: id.to_string(),
        rule: rule_name.to_string(),
        pool: String::new(),
        variables: HashMap::new(),
    }
}

#[test]
fn linear_chain_topo_order_and_no_cycles() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("a.o", "cc"), &["a.c".to_string()], &["a.o".to_string()], &[], &[])
        .unwrap();
    model
        .add_build(build("prog", "cc"), &["a.o".to_string()], &["prog".to_string()], &[], &[])
        .unwrap();

    let order = algo::build_order(&query).unwrap();
    assert_eq!(order, vec!["a.o".to_string(), "prog".to_string()]);
    assert!(algo::find_cycles(&query).unwrap().is_empty());
}

#[test]
fn diamond_topo_order_has_source_first_and_sink_last() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("a", "cc"), &["c".to_string()], &["a".to_string()], &[], &[])
        .unwrap();
    model
        .add_build(build("b", "cc"), &["c".to_string()], &["b".to_string()], &[], &[])
        .unwrap();
    model
        .add_build(
            build("d", "cc"),
            &["a".to_string(), "b".to_string()],
            &["d".to_string()],
            &[],
            &[],
        )
        .unwrap();
    // `c` must itself be a Target for the topo order to include it.
    model
        .add_build(build("c", "cc"), &[], &["c".to_string()], &[], &[])
        .unwrap();

    let order = algo::build_order(&query).unwrap();
    assert_eq!(order.first().unwrap(), "c");
    assert_eq!(order.last().unwrap(), "d");
}

#[test]
fn cycle_is_detected_and_build_order_fails() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("a", "cc"), &["b".to_string()], &["a".to_string()], &[], &[])
        .unwrap();
    model
        .add_build(build("b", "cc"), &["a".to_string()], &["b".to_string()], &[], &[])
        .unwrap();

    let cycles = algo::find_cycles(&query).unwrap();
    assert_eq!(cycles.len(), 1);
    let mut nodes = cycles[0].clone();
    nodes.sort();
    assert_eq!(nodes, vec!["a".to_string(), "b".to_string()]);

    let err = algo::build_order(&query).unwrap_err();
    assert!(matches!(err, ninjagraph::CoreError::CycleDetected(_)));
}

#[test]
fn empty_store_has_empty_build_order() {
    let (_dir, _model, query) = open_model();
    assert!(algo::build_order(&query).unwrap().is_empty());
    assert!(algo::find_cycles(&query).unwrap().is_empty());
}

#[test]
fn order_only_deps_do_not_create_edges() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("gen.h", "cc"), &[], &["gen.h".to_string()], &[], &[])
        .unwrap();
    model
        .add_build(build("out", "cc"), &["in".to_string()], &["out".to_string()], &[], &["gen.h".to_string()])
        .unwrap();

    // gen.h has no depends_on consumer, so it never precedes `out` in the
    // Target-induced subgraph even though it must exist first at build time.
    let order = algo::build_order(&query).unwrap();
    assert_eq!(order.len(), 2);
    assert!(!query
        .get_reverse_dependencies("gen.h")
        .unwrap()
        .iter()
        .any(|t| t.path == "out"));
}
