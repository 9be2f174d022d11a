//! Dependency Leveling
//!
//! Groups the nodes of a snapshot into ordered levels such that every
//! dependency of a node sits in a strictly earlier level. Level 0 holds the
//! nodes with no recorded dependencies.
//!
//! # Algorithm
//!
//! Kahn's algorithm, processed a whole level at a time:
//!
//! 1. Count each node's dependencies (its in-degree).
//! 2. The current level is every node whose count is zero.
//! 3. Removing the level decrements the count of each of its dependents;
//!    those reaching zero form the next level.
//! 4. Nodes never reaching zero lie on, or downstream of, a cycle.

use indexmap::IndexMap;

use super::DependencySnapshot;
use crate::error::{GraphError, Result};

/// Level the snapshot, or fail with [`GraphError::Cycle`].
///
/// A dependency that is not itself a key of the snapshot is reported as
/// [`GraphError::UnknownNode`].
pub fn levels(snapshot: &DependencySnapshot) -> Result<Vec<Vec<String>>> {
    let mut in_degree: IndexMap<&str, usize> = IndexMap::with_capacity(snapshot.len());
    let mut dependents: IndexMap<&str, Vec<&str>> = IndexMap::new();

    for (node, dependencies) in snapshot.iter() {
        for dependency in dependencies {
            if !snapshot.contains_node(dependency) {
                return Err(GraphError::UnknownNode(dependency.clone()));
            }
            dependents.entry(dependency.as_str()).or_default().push(node);
        }
        in_degree.insert(node, dependencies.len());
    }

    let mut current: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&node, _)| node)
        .collect();
    let mut levels = Vec::new();
    let mut processed = 0;

    while !current.is_empty() {
        let mut next = Vec::new();

        for node in &current {
            for &dependent in dependents.get(node).into_iter().flatten() {
                let degree = &mut in_degree[dependent];
                *degree -= 1;
                if *degree == 0 {
                    next.push(dependent);
                }
            }
        }

        processed += current.len();
        levels.push(current.iter().map(|node| node.to_string()).collect());
        current = next;
    }

    if processed != snapshot.len() {
        let stuck = in_degree
            .into_iter()
            .filter(|&(_, degree)| degree > 0)
            .map(|(node, _)| node.to_string())
            .collect();
        return Err(GraphError::Cycle(stuck));
    }

    Ok(levels)
}
