//! Integration coverage for the Graph Model's write operations and
//! invariants (spec.md §4.2, §8).

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
        command: format!("{name}-command"),
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
fn add_rule_is_idempotent() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model.add_rule(rule("cc")).unwrap();

    let r = query.get_rule("cc").unwrap();
    assert_eq!(r.command, "cc-command");
}

#[test]
fn add_build_creates_targets_and_files() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("a.o", "cc"), &["a.c".to_string()], &["a.o".to_string()], &[], &[])
        .unwrap();

    let target = query.get_target("a.o").unwrap();
    assert_eq!(target.status, "clean");
    assert_eq!(target.build, "build:a.o");

    let file = query.get_file("a.c").unwrap();
    assert_eq!(file.file_type.as_str(), "source");
}

#[test]
fn zero_inputs_creates_output_with_no_depends_on() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("touch")).unwrap();
    model
        .add_build(build("a.stamp", "touch"), &[], &["a.stamp".to_string()], &[], &[])
        .unwrap();

    let deps = query.get_build_dependencies("a.stamp").unwrap();
    assert!(deps.is_empty());
}

#[test]
fn redeclaring_output_preserves_status() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(build("a.o", "cc"), &["a.c".to_string()], &["a.o".to_string()], &[], &[])
        .unwrap();
    model.update_target_status("a.o", "dirty").unwrap();

    // Re-declaring the same build must not clobber the status update.
    model
        .add_build(build("a.o", "cc"), &["a.c".to_string()], &["a.o".to_string()], &[], &[])
        .unwrap();

    let target = query.get_target("a.o").unwrap();
    assert_eq!(target.status, "dirty");
}

#[test]
fn update_target_status_requires_existing_target() {
    let (_dir, model, _query) = open_model();
    let err = model.update_target_status("missing.o", "dirty").unwrap_err();
    assert!(matches!(err, ninjagraph::CoreError::NotFound(_)));
}

#[test]
fn implicit_deps_contribute_to_depends_on_but_order_deps_do_not() {
    let (_dir, model, query) = open_model();
    model.add_rule(rule("cc")).unwrap();
    model
        .add_build(
            build("out", "cc"),
            &["in".to_string()],
            &["out".to_string()],
            &["h.h".to_string()],
            &["gen.h".to_string()],
        )
        .unwrap();

    let mut deps: Vec<String> = query
        .get_build_dependencies("out")
        .unwrap()
        .into_iter()
        .map(|f| f.path)
        .collect();
    deps.sort();
    assert_eq!(deps, vec!["h.h".to_string(), "in".to_string()]);
}
