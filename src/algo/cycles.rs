//! Cycle detection via three-color DFS — spec.md §4.5.

use super::common::{build_target_graph, TargetGraph};
use crate::error::{Cycle, CoreResult};
use crate::query::QueryEngine;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    Visiting,
    Done,
}

/// Finds every cycle in the Target-induced subgraph. Never fails on cycle
/// presence; returns an empty list for an acyclic graph.
pub fn find_cycles(qe: &QueryEngine) -> CoreResult<Vec<Cycle>> {
    let TargetGraph { nodes, successors } = build_target_graph(qe)?;

    let mut color: HashMap<String, Color> = nodes.iter().map(|n| (n.clone(), Color::Unvisited)).collect();
    let mut path: Vec<String> = Vec::new();
    let mut cycles: Vec<Cycle> = Vec::new();

    for start in &nodes {
        if color[start] == Color::Unvisited {
            visit(start, &successors, &mut color, &mut path, &mut cycles);
        }
    }

    Ok(cycles)
}

fn visit(
    node: &str,
    successors: &HashMap<String, Vec<String>>,
    color: &mut HashMap<String, Color>,
    path: &mut Vec<String>,
    cycles: &mut Vec<Cycle>,
) {
    color.insert(node.to_string(), Color::Visiting);
    path.push(node.to_string());

    if let Some(succs) = successors.get(node).cloned() {
        for succ in &succs {
            match color.get(succ.as_str()).copied().unwrap_or(Color::Unvisited) {
                Color::Visiting => {
                    let start = path.iter().position(|n| n == succ).expect("visiting node must be on path");
                    cycles.push(path[start..].to_vec());
                }
                Color::Unvisited => {
                    visit(succ, successors, color, path, cycles);
                }
                Color::Done => {}
            }
        }
    }

    path.pop();
    color.insert(node.to_string(), Color::Done);
}

#[cfg(test)]
mod tests {
    // Exercised indirectly via algo integration tests against a real store;
    // the DFS itself is deterministic and covered end-to-end there.
}
