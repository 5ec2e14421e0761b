use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use mg_core::dependency::DependencyMap;
use tracing::trace;

/// A cycle found during traversal: the member that closes it and every node on it,
/// starting with the closer. Back-edges into the same closer are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub closer: String,
    pub nodes: IndexSet<String>,
}

/// The first member that closes a cycle, if the map has any. Roots are visited in the map's
/// key order, so the answer is the same on every run.
pub fn has_cycle(map: &DependencyMap) -> Option<String> {
    cycle_closers(map).into_iter().next()
}

/// Every member that closes a cycle: the on-stack target of some back-edge. The traversal
/// does not stop at the first cycle, so independent cycles are all reported, in discovery
/// order.
pub fn cycle_closers(map: &DependencyMap) -> Vec<String> {
    find_cycles(map).into_iter().map(|c| c.closer).collect()
}

/// Every cycle of the map, keyed by its closer in discovery order.
pub fn find_cycles(map: &DependencyMap) -> Vec<Cycle> {
    let mut visited = HashSet::new();
    let mut stack = Vec::new();
    let mut cycles = IndexMap::new();

    for root in map.producers() {
        if !visited.contains(root) {
            dfs(root, map, &mut visited, &mut stack, &mut cycles);
        }
    }

    cycles
        .into_iter()
        .map(|(closer, nodes)| Cycle { closer, nodes })
        .collect()
}

fn dfs<'a>(
    node: &'a str,
    map: &'a DependencyMap,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
    cycles: &mut IndexMap<String, IndexSet<String>>,
) {
    stack.push(node);

    for next in map.consumers(node) {
        if let Some(start) = stack.iter().position(|n| *n == next) {
            trace!(from = node, to = next, "back edge");
            cycles
                .entry(next.to_string())
                .or_default()
                .extend(stack[start..].iter().map(|n| n.to_string()));
        } else if !visited.contains(next) {
            dfs(next, map, visited, stack, cycles);
        }
    }

    stack.pop();
    visited.insert(node);
}
