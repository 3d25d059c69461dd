//! Tree path resolver.
//!
//! Computes, for every ordered pair of distinct end-systems, the unique
//! simple path through the tree and stores it as a sequence of directed
//! link indices. Trees have exactly one simple path between any two nodes,
//! so no weights or shortest-path tie-breaking are involved.

use std::collections::HashMap;

use log::info;

use crate::network::{Network, NetworkError};

/// Resolved paths between ordered (sender, receiver) end-system pairs.
///
/// Paths exist only between distinct end-systems; a node paired with
/// itself has no entry. Each path is the ordered list of directed link
/// indices traversed from sender to receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatrix {
    paths: HashMap<(usize, usize), Vec<usize>>,
}

impl PathMatrix {
    /// Link indices from `sender` to `receiver`, if resolved.
    pub fn get(&self, sender: usize, receiver: usize) -> Option<&[usize]> {
        self.paths.get(&(sender, receiver)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub(crate) fn insert(&mut self, sender: usize, receiver: usize, links: Vec<usize>) {
        self.paths.insert((sender, receiver), links);
    }
}

impl Network {
    /// Resolve the path matrix for the current topology.
    ///
    /// Idempotent: resolving twice over the same topology yields identical
    /// link-index sequences. A consecutive node pair missing from the link
    /// registry means the builder produced an inconsistent graph and is
    /// reported as a consistency failure.
    pub fn generate_paths(&mut self) -> Result<(), NetworkError> {
        // First directed entry wins; later duplicates cannot occur in a tree
        let mut lookup: HashMap<(usize, usize), usize> = HashMap::new();
        for (index, entry) in self.links.iter().enumerate() {
            lookup.entry((entry.source, entry.destination)).or_insert(index);
        }

        let mut matrix = PathMatrix::default();
        for &sender in &self.end_systems {
            for &receiver in &self.end_systems {
                if sender == receiver {
                    continue;
                }
                let nodes = self.node_path(sender, receiver).ok_or_else(|| {
                    NetworkError::Consistency(format!(
                        "no path between end systems {} and {}; the graph is not a connected tree",
                        sender, receiver
                    ))
                })?;
                let mut links = Vec::with_capacity(nodes.len().saturating_sub(1));
                for pair in nodes.windows(2) {
                    let index = lookup.get(&(pair[0], pair[1])).copied().ok_or_else(|| {
                        NetworkError::Consistency(format!(
                            "nodes {} and {} are adjacent on a path but share no link entry",
                            pair[0], pair[1]
                        ))
                    })?;
                    links.push(index);
                }
                matrix.insert(sender, receiver, links);
            }
        }

        info!(
            "Resolved {} path(s) between {} end system(s)",
            matrix.len(),
            self.end_systems.len()
        );
        self.paths = matrix;
        Ok(())
    }

    /// Node sequence from `start` to `goal`, by breadth-first search over
    /// the adjacency lists.
    fn node_path(&self, start: usize, goal: usize) -> Option<Vec<usize>> {
        let mut parent: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = std::collections::VecDeque::new();
        visited[start] = true;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            if node == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(prev) = parent[cursor] {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for &neighbor in &self.adjacency[node] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    parent[neighbor] = Some(node);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_ordered_pair() {
        let mut network = Network::with_seed(1);
        network.create_network("2;-2;-2", None).unwrap();
        network.generate_paths().unwrap();
        let n = network.end_systems().len();
        assert_eq!(network.paths().len(), n * (n - 1));
        for &a in network.end_systems() {
            assert!(network.paths().get(a, a).is_none());
        }
    }

    #[test]
    fn sibling_leaves_cross_one_switch() {
        // root with two leaves: leaf-root-leaf, two hops
        let mut network = Network::with_seed(1);
        network.create_network("-2", None).unwrap();
        network.generate_paths().unwrap();
        let [a, b] = [network.end_systems()[0], network.end_systems()[1]];
        let forward = network.paths().get(a, b).unwrap();
        assert_eq!(forward.len(), 2);
        let backward = network.paths().get(b, a).unwrap();
        assert_eq!(backward.len(), 2);
        assert_ne!(forward, backward);
    }

    #[test]
    fn path_links_chain_source_to_destination() {
        let mut network = Network::with_seed(1);
        network.create_network("2;1;-1;-2", None).unwrap();
        network.generate_paths().unwrap();
        for &a in network.end_systems() {
            for &b in network.end_systems() {
                if a == b {
                    continue;
                }
                let path = network.paths().get(a, b).unwrap();
                let entries = network.links();
                assert_eq!(entries[path[0]].source, a);
                assert_eq!(entries[*path.last().unwrap()].destination, b);
                for pair in path.windows(2) {
                    assert_eq!(entries[pair[0]].destination, entries[pair[1]].source);
                }
            }
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut network = Network::with_seed(1);
        network.create_network("3;-2;1;-1;2;0;-1", None).unwrap();
        network.generate_paths().unwrap();
        let first = network.paths().clone();
        network.generate_paths().unwrap();
        assert_eq!(first, *network.paths());
    }
}
