//! Topological build order via Kahn's algorithm — spec.md §4.5.

use super::common::{build_target_graph, TargetGraph};
use crate::error::{CoreError, CoreResult};
use crate::query::QueryEngine;
use std::collections::{HashMap, VecDeque};

/// Returns targets in dependency order: for every edge `D → T`, `D` precedes
/// `T`. Empty if there are no targets. `CycleDetected` if not every node
/// could be emitted.
pub fn build_order(qe: &QueryEngine) -> CoreResult<Vec<String>> {
    let TargetGraph { nodes, successors } = build_target_graph(qe)?;
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let mut in_degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.as_str(), 0)).collect();
    for succs in successors.values() {
        for s in succs {
            *in_degree.get_mut(s.as_str()).unwrap() += 1;
        }
    }

    // Initial queue: every node with in-degree 0, in enumeration order.
    let mut queue: VecDeque<String> = nodes
        .iter()
        .filter(|n| in_degree[n.as_str()] == 0)
        .cloned()
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(node) = queue.pop_front() {
        order.push(node.clone());
        if let Some(succs) = successors.get(&node) {
            for s in succs {
                let deg = in_degree.get_mut(s.as_str()).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(s.clone());
                }
            }
        }
    }

    if order.len() != nodes.len() {
        let cycles = super::cycles::find_cycles(qe)?;
        return Err(CoreError::CycleDetected(cycles));
    }

    Ok(order)
}
