//! The Ninja Parser (NP) — spec.md §4.3.
//!
//! A line-oriented state machine that turns Ninja text into a list of rule
//! and build declarations. `parse` never touches the graph store: per
//! DESIGN.md Open Question 4, the whole file is parsed into memory first and
//! only committed via [`crate::graph::GraphModel`] once parsing succeeds in
//! full, so a mid-file syntax error leaves the store untouched.

use super::tokenize::{ends_with_continuation, tokenize_paths};
use crate::error::{CoreError, CoreResult};
use crate::graph::{BuildInput, GraphModel, Rule};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBuild {
    pub build_id: String,
    pub rule: String,
    pub pool: String,
    pub variables: HashMap<String, String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub implicit_deps: Vec<String>,
    pub order_deps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGraph {
    pub rules: Vec<Rule>,
    pub builds: Vec<ParsedBuild>,
}

#[derive(Debug, Default)]
struct PendingRule {
    name: String,
    command: Option<String>,
    description: String,
    variables: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct PendingBuild {
    outputs: Vec<String>,
    rule: String,
    inputs: Vec<String>,
    implicit_deps: Vec<String>,
    order_deps: Vec<String>,
    pool: String,
    variables: HashMap<String, String>,
}

enum State {
    Idle,
    InRule(PendingRule),
    InBuild(PendingBuild),
}

/// Parse a complete Ninja build description into rule and build
/// declarations. Does not write to the graph.
pub fn parse(text: &str) -> CoreResult<ParsedGraph> {
    let mut graph = ParsedGraph::default();
    let mut state = State::Idle;

    for (indented, content) in logical_lines(text) {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if indented {
            apply_indented_line(&mut state, trimmed);
            continue;
        }

        // Any top-level construct flushes whatever context was open.
        flush(&mut state, &mut graph)?;

        let mut words = trimmed.splitn(2, char::is_whitespace);
        let keyword = words.next().unwrap_or("");
        let rest = words.next().unwrap_or("").trim_start();

        match keyword {
            "rule" => {
                state = State::InRule(PendingRule {
                    name: rest.split_whitespace().next().unwrap_or("").to_string(),
                    ..Default::default()
                });
            }
            "build" => {
                state = match parse_build_header(rest)? {
                    Some(pending) => State::InBuild(pending),
                    None => State::Idle,
                };
            }
            "pool" | "variable" => {
                state = State::Idle;
            }
            _ => {
                state = State::Idle;
            }
        }
    }

    flush(&mut state, &mut graph)?;
    Ok(graph)
}

fn apply_indented_line(state: &mut State, line: &str) {
    let Some((key, value)) = line.split_once('=') else {
        return;
    };
    let key = key.trim();
    let value = value.trim();

    match state {
        State::InRule(rule) => match key {
            "command" => rule.command = Some(value.to_string()),
            "description" => rule.description = value.to_string(),
            _ => {
                rule.variables.insert(key.to_string(), value.to_string());
            }
        },
        State::InBuild(build) => match key {
            "pool" => build.pool = value.to_string(),
            _ => {
                build.variables.insert(key.to_string(), value.to_string());
            }
        },
        State::Idle => {}
    }
}

/// Parses `<outputs>: <rule> <inputs> [ | <implicit_deps> ] [ || <order_deps> ]`
/// (the part of a `build` line after the `build` keyword). Returns `None`
/// if there is no `:` — that build line is silently skipped per spec.md §4.3.
fn parse_build_header(rest: &str) -> CoreResult<Option<PendingBuild>> {
    let Some((outputs_str, after_colon)) = rest.split_once(':') else {
        return Ok(None);
    };

    let outputs = tokenize_paths(outputs_str);

    let (main_part, order_part) = match after_colon.split_once("||") {
        Some((a, b)) => (a, Some(b)),
        None => (after_colon, None),
    };
    let (before_implicit, implicit_part) = match main_part.split_once('|') {
        Some((a, b)) => (a, Some(b)),
        None => (main_part, None),
    };

    let mut tokens = tokenize_paths(before_implicit);
    if tokens.is_empty() {
        return Ok(None);
    }
    let rule = tokens.remove(0);
    let inputs = tokens;
    let implicit_deps = implicit_part.map(tokenize_paths).unwrap_or_default();
    let order_deps = order_part.map(tokenize_paths).unwrap_or_default();

    Ok(Some(PendingBuild {
        outputs,
        rule,
        inputs,
        implicit_deps,
        order_deps,
        pool: String::new(),
        variables: HashMap::new(),
    }))
}

fn flush(state: &mut State, graph: &mut ParsedGraph) -> CoreResult<()> {
    match std::mem::replace(state, State::Idle) {
        State::Idle => Ok(()),
        State::InRule(rule) => {
            let command = rule
                .command
                .ok_or_else(|| CoreError::ParseError(format!("rule `{}` is missing `command`", rule.name)))?;
            graph.rules.push(Rule {
                name: rule.name,
                command,
                description: rule.description,
                variables: rule.variables,
            });
            Ok(())
        }
        State::InBuild(build) => {
            if build.outputs.is_empty() {
                return Err(CoreError::ParseError("build declares zero outputs".to_string()));
            }
            graph.builds.push(ParsedBuild {
                build_id: build.outputs.join(","),
                rule: build.rule,
                pool: build.pool,
                variables: build.variables,
                inputs: build.inputs,
                outputs: build.outputs,
                implicit_deps: build.implicit_deps,
                order_deps: build.order_deps,
            });
            Ok(())
        }
    }
}

/// Joins `$`-continued physical lines into logical lines, returning
/// `(is_indented, content)` pairs. Indentation is taken from each logical
/// line's first physical line.
fn logical_lines(text: &str) -> Vec<(bool, String)> {
    let mut result = Vec::new();
    let mut lines = text.lines();

    while let Some(first) = lines.next() {
        let indented = first.starts_with(' ') || first.starts_with('\t');
        let mut content = first.to_string();

        while ends_with_continuation(&content) {
            content.pop(); // drop the trailing '$'
            while content.ends_with(|c: char| c.is_whitespace()) {
                content.pop();
            }
            match lines.next() {
                Some(next) => {
                    content.push(' ');
                    content.push_str(next.trim_start());
                }
                None => break,
            }
        }

        result.push((indented, content));
    }

    result
}

/// Load a previously parsed graph into the store via [`GraphModel`], result
/// containing how many rules and builds were written.
pub struct LoadStats {
    pub rules_loaded: usize,
    pub builds_loaded: usize,
}

pub fn load_into(model: &GraphModel, parsed: ParsedGraph) -> CoreResult<LoadStats> {
    let rules_loaded = parsed.rules.len();
    for rule in parsed.rules {
        model.add_rule(rule)?;
    }

    let builds_loaded = parsed.builds.len();
    for build in parsed.builds {
        model.add_build(
            BuildInput {
                build_id: build.build_id,
                rule: build.rule,
                pool: build.pool,
                variables: build.variables,
            },
            &build.inputs,
            &build.outputs,
            &build.implicit_deps,
            &build.order_deps,
        )?;
    }

    Ok(LoadStats {
        rules_loaded,
        builds_loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_linear_chain() {
        let text = "rule cc\n  command = gcc -c $in -o $out\nbuild a.o: cc a.c\nbuild prog: cc a.o\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.rules[0].name, "cc");
        assert_eq!(parsed.builds.len(), 2);
        assert_eq!(parsed.builds[0].build_id, "a.o");
        assert_eq!(parsed.builds[0].inputs, vec!["a.c"]);
        assert_eq!(parsed.builds[1].build_id, "prog");
    }

    #[test]
    fn parses_implicit_and_order_deps() {
        let text = "rule cc\n  command = cc\nbuild out: cc in | h.h || gen.h\n";
        let parsed = parse(text).unwrap();
        let b = &parsed.builds[0];
        assert_eq!(b.inputs, vec!["in"]);
        assert_eq!(b.implicit_deps, vec!["h.h"]);
        assert_eq!(b.order_deps, vec!["gen.h"]);
    }

    #[test]
    fn line_continuation_joins_with_single_space() {
        let text = "rule cc\n  command = gcc $\n    -O2 $in\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.rules[0].command, "gcc -O2 $in");
    }

    #[test]
    fn missing_command_fails_whole_parse() {
        let text = "rule cc\n  description = no command here\n";
        assert!(matches!(parse(text), Err(CoreError::ParseError(_))));
    }

    #[test]
    fn build_without_colon_is_skipped() {
        let text = "build a.o cc a.c\n";
        let parsed = parse(text).unwrap();
        assert!(parsed.builds.is_empty());
    }

    #[test]
    fn empty_file_parses_to_nothing() {
        let parsed = parse("").unwrap();
        assert!(parsed.rules.is_empty());
        assert!(parsed.builds.is_empty());
    }

    #[test]
    fn escaped_space_in_path() {
        let text = "rule cc\n  command = cc\nbuild out: cc a\\ b.c\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.builds[0].inputs, vec!["a b.c"]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# a comment\n\nrule cc\n  command = cc\n\nbuild a.o: cc a.c\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.builds.len(), 1);
    }
}
