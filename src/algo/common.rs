//! Target-induced subgraph adapter shared by topological sort and cycle
//! detection — spec.md §4.5. Grounded on the teacher's `algo/common.rs`
//! `GraphView` adapter: both algorithms walk the same `D → T` edge set
//! built once here instead of querying the store independently.

use crate::query::QueryEngine;
use std::collections::{HashMap, HashSet};

use crate::error::CoreResult;

/// Nodes are Target paths; an edge `D → T` means dependency `D` must be
/// built before target `T`.
pub struct TargetGraph {
    pub nodes: Vec<String>,
    /// successors[d] = targets that depend on d
    pub successors: HashMap<String, Vec<String>>,
}

/// Builds the Target-induced subgraph: for each Target `T`, for each of its
/// dependencies `D` (per [`QueryEngine::get_build_dependencies`]), if `D` is
/// also a Target, add edge `D → T`. Enumeration order follows the store's
/// (unspecified) target enumeration order.
pub fn build_target_graph(qe: &QueryEngine) -> CoreResult<TargetGraph> {
    let targets = qe.get_all_targets()?;
    let target_paths: HashSet<String> = targets.iter().map(|t| t.path.clone()).collect();

    let mut nodes = Vec::with_capacity(targets.len());
    let mut successors: HashMap<String, Vec<String>> = HashMap::new();
    for path in &target_paths {
        successors.entry(path.clone()).or_default();
    }

    for target in &targets {
        nodes.push(target.path.clone());
        for dep in qe.get_build_dependencies(&target.path)? {
            if target_paths.contains(&dep.path) {
                successors.entry(dep.path.clone()).or_default().push(target.path.clone());
            }
        }
    }

    Ok(TargetGraph { nodes, successors })
}
