//! Grammar-driven topology builder.
//!
//! Consumes the pre-order description grammar and grows the tree. The walk
//! uses an explicit cursor into the token stream and a stack of pending
//! branches instead of threading a consumed-token count through recursive
//! calls; the creation order of nodes and links is identical to the
//! depth-first, left-to-right recursion it replaces (a branch's second
//! child switch is only created after the first child's whole subtree).

use log::{debug, info};

use crate::network::descriptor::{self, LinkSpec};
use crate::network::types::{Link, LinkEntry, Node, NodeKind};
use crate::network::{Network, NetworkError};

/// A switch that declared `remaining` further switch children which have
/// not been created yet.
struct PendingBranch {
    parent: usize,
    remaining: i64,
}

impl Network {
    /// Build the topology described by `description`.
    ///
    /// All previously owned state (nodes, links, paths, frames, collision
    /// domains, dependencies) is cleared first; a failed build leaves the
    /// network empty rather than partially constructed.
    ///
    /// Grammar, one token per described node, pre-order:
    /// - `v > 0`: the node gains `v` switch children, each entered depth
    ///   first before its next sibling is created;
    /// - `v < 0`: the node gains `|v|` end-system leaves;
    /// - `v == 0`: the node itself is reclassified from switch to
    ///   end-system (terminal, only ever applied to a childless switch).
    ///
    /// The root is always created as a switch before the first token is
    /// examined. A single trailing `0` after the root's subtree completes is
    /// accepted as an explicit terminator: it reclassifies a still-childless
    /// root and is a no-op otherwise. Any other leftover tokens, or tokens
    /// running out with open branches, are structural errors.
    ///
    /// When `link_description` is supplied it must contain exactly one
    /// `{w|x}<speed>` spec per created link, consumed in creation order;
    /// when omitted every link is wired at the reference speed.
    pub fn create_network(
        &mut self,
        description: &str,
        link_description: Option<&str>,
    ) -> Result<(), NetworkError> {
        let tokens = descriptor::parse_description(description)?;
        let specs = link_description
            .map(descriptor::parse_link_description)
            .transpose()?;

        self.reset();
        let result = self.build_tree(&tokens, specs.as_deref());
        if result.is_err() {
            // No partial graphs escape a failed build
            self.reset();
        } else {
            info!(
                "Built topology: {} switches, {} end systems, {} links",
                self.switches.len(),
                self.end_systems.len(),
                self.links.len() / 2
            );
        }
        result
    }

    fn build_tree(&mut self, tokens: &[i64], specs: Option<&[LinkSpec]>) -> Result<(), NetworkError> {
        let root = self.add_switch();
        let mut cursor = 0usize;
        let mut branches: Vec<PendingBranch> = Vec::new();
        let mut current = root;

        loop {
            let token = *tokens.get(cursor).ok_or_else(|| {
                NetworkError::Description(
                    "there are open branches: the description ended before every switch was described"
                        .to_string(),
                )
            })?;
            cursor += 1;
            debug!("token {} describes node {}", token, current);

            if token < 0 {
                for _ in 0..token.unsigned_abs() {
                    let leaf = self.add_end_system();
                    self.attach_link(current, leaf, specs)?;
                }
            } else if token == 0 {
                self.reclassify_switch(current);
            } else {
                branches.push(PendingBranch {
                    parent: current,
                    remaining: token,
                });
            }

            // Advance to the next undescribed node: the next child of the
            // topmost unfinished branch, or finish when none remain.
            loop {
                match branches.last_mut() {
                    Some(branch) if branch.remaining > 0 => {
                        branch.remaining -= 1;
                        let parent = branch.parent;
                        let child = self.add_switch();
                        self.attach_link(parent, child, specs)?;
                        current = child;
                        break;
                    }
                    Some(_) => {
                        branches.pop();
                    }
                    None => {
                        return self.finish_build(tokens, cursor, specs);
                    }
                }
            }
        }
    }

    /// Leftover-token and link-spec accounting once the walk is complete.
    fn finish_build(
        &mut self,
        tokens: &[i64],
        mut cursor: usize,
        specs: Option<&[LinkSpec]>,
    ) -> Result<(), NetworkError> {
        // A single trailing 0 is accepted as an explicit terminator for the
        // root. The root's own token already ran, so it is a no-op.
        if cursor == tokens.len() - 1 && tokens[cursor] == 0 {
            cursor += 1;
        }
        if cursor != tokens.len() {
            return Err(NetworkError::Description(format!(
                "there are {} extra element(s) after the network was fully described",
                tokens.len() - cursor
            )));
        }
        if let Some(specs) = specs {
            let created = self.links.len() / 2;
            if specs.len() != created {
                return Err(NetworkError::LinkDescription(format!(
                    "the link description has {} element(s) but {} link(s) were created",
                    specs.len(),
                    created
                )));
            }
        }
        Ok(())
    }

    fn add_switch(&mut self) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::new(NodeKind::Switch));
        self.adjacency.push(Vec::new());
        self.switches.push(id);
        id
    }

    fn add_end_system(&mut self) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::new(NodeKind::EndSystem));
        self.adjacency.push(Vec::new());
        self.end_systems.push(id);
        id
    }

    /// Append the two directed entries for a new physical link, consuming
    /// the next link spec when one was supplied.
    fn attach_link(
        &mut self,
        source: usize,
        destination: usize,
        specs: Option<&[LinkSpec]>,
    ) -> Result<(), NetworkError> {
        let created = self.links.len() / 2;
        let link = match specs {
            Some(specs) => {
                let spec = specs.get(created).ok_or_else(|| {
                    NetworkError::LinkDescription(format!(
                        "the link description ran out after {} element(s); more links are being created",
                        specs.len()
                    ))
                })?;
                Link::new(spec.speed, spec.medium)?
            }
            None => Link::default(),
        };
        self.links.push(LinkEntry {
            source,
            destination,
            link,
        });
        self.links.push(LinkEntry {
            source: destination,
            destination: source,
            link,
        });
        self.adjacency[source].push(destination);
        self.adjacency[destination].push(source);
        Ok(())
    }

    /// One-way switch to end-system transition for a terminal branch token.
    fn reclassify_switch(&mut self, node: usize) {
        self.nodes[node].reclassify_to_end_system();
        self.switches.retain(|&id| id != node);
        self.end_systems.push(node);
    }

    /// Re-derive a description token sequence from the built tree.
    ///
    /// The result is canonical rather than literal: a switch whose children
    /// are all childless end-systems is described with one negative token,
    /// so a tree built from `"1;0"` re-derives as `[-1]`. Building from the
    /// re-derived sequence reproduces the same tree shape.
    pub fn description_tokens(&self) -> Vec<i64> {
        let mut tokens = Vec::new();
        if !self.nodes.is_empty() {
            self.describe_node(0, None, &mut tokens);
        }
        tokens
    }

    fn describe_node(&self, node: usize, parent: Option<usize>, tokens: &mut Vec<i64>) {
        if self.nodes[node].is_end_system() {
            tokens.push(0);
            return;
        }
        let children: Vec<usize> = self.adjacency[node]
            .iter()
            .copied()
            .filter(|&neighbor| Some(neighbor) != parent)
            .collect();
        let all_leaves = children
            .iter()
            .all(|&child| self.nodes[child].is_end_system() && self.adjacency[child].len() == 1);
        if all_leaves {
            tokens.push(-(children.len() as i64));
        } else {
            tokens.push(children.len() as i64);
            for child in children {
                self.describe_node(child, Some(node), tokens);
            }
        }
    }

    /// Snapshot of per-node kinds and degrees, used to compare tree shapes.
    pub fn shape(&self) -> Vec<(NodeKind, usize)> {
        let mut shape: Vec<(NodeKind, usize)> = self
            .nodes
            .iter()
            .zip(&self.adjacency)
            .map(|(node, neighbors)| (node.kind(), neighbors.len()))
            .collect();
        shape.sort();
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::types::Medium;

    #[test]
    fn builds_single_switch_with_leaves() {
        let mut network = Network::with_seed(1);
        network.create_network("1;-2;0", None).unwrap();
        // root switch, 1 child switch, 2 end system leaves
        assert_eq!(network.num_nodes(), 4);
        assert_eq!(network.switches().len(), 2);
        assert_eq!(network.end_systems().len(), 2);
        // 3 physical links, 6 directed entries
        assert_eq!(network.links().len(), 6);
        assert_eq!(network.nodes()[0].kind(), NodeKind::Switch);
    }

    #[test]
    fn builds_reference_topology() {
        // Topology from the generator's reference configuration
        let mut network = Network::with_seed(1);
        network.create_network("3;-2;1;-1;2;0;-1", None).unwrap();
        // root + 6 created switches (one reclassified) + 4 leaves
        assert_eq!(network.num_nodes(), 11);
        assert_eq!(network.switches().len(), 6);
        assert_eq!(network.end_systems().len(), 5);
        assert_eq!(network.links().len(), 20);
    }

    #[test]
    fn node_and_link_counts_are_consistent() {
        for description in ["-3", "2;-2;-2", "2;1;-1;-4", "3;-1;-1;-1"] {
            let mut network = Network::with_seed(1);
            network.create_network(description, None).unwrap();
            assert_eq!(
                network.switches().len() + network.end_systems().len(),
                network.num_nodes()
            );
            // A tree: node count is undirected link count plus one
            assert_eq!(network.links().len(), (network.num_nodes() - 1) * 2);
        }
    }

    #[test]
    fn zero_reclassifies_childless_switch() {
        let mut network = Network::with_seed(1);
        network.create_network("2;0;-1", None).unwrap();
        // root's first child became an end system with no children
        assert!(network.nodes()[1].is_end_system());
        assert_eq!(network.adjacency[1].len(), 1);
    }

    #[test]
    fn reclassified_switch_has_no_children() {
        // Pins down the grammar decision: one token per node means a
        // reclassified node can never have received children first.
        let mut network = Network::with_seed(1);
        network.create_network("2;0;-2", None).unwrap();
        assert!(network.nodes()[1].is_end_system());
        // Only the link up to its parent
        assert_eq!(network.adjacency[1].len(), 1);
    }

    #[test]
    fn root_zero_makes_single_end_system() {
        let mut network = Network::with_seed(1);
        network.create_network("0", None).unwrap();
        assert_eq!(network.num_nodes(), 1);
        assert!(network.nodes()[0].is_end_system());
        assert!(network.links().is_empty());
    }

    #[test]
    fn open_branches_are_rejected() {
        let mut network = Network::with_seed(1);
        let err = network.create_network("2;-1", None).unwrap_err();
        assert!(matches!(err, NetworkError::Description(_)));
        // Failed builds leave nothing behind
        assert_eq!(network.num_nodes(), 0);
    }

    #[test]
    fn extra_tokens_are_rejected() {
        let mut network = Network::with_seed(1);
        let err = network.create_network("-2;-1", None).unwrap_err();
        assert!(matches!(err, NetworkError::Description(_)));
        let err = network.create_network("1;-2;0;0", None).unwrap_err();
        assert!(matches!(err, NetworkError::Description(_)));
    }

    #[test]
    fn trailing_zero_terminator_is_a_noop_for_branched_root() {
        let mut with_terminator = Network::with_seed(1);
        with_terminator.create_network("1;-2;0", None).unwrap();
        let mut without = Network::with_seed(1);
        without.create_network("1;-2", None).unwrap();
        assert_eq!(with_terminator.shape(), without.shape());
        assert_eq!(with_terminator.nodes()[0].kind(), NodeKind::Switch);
    }

    #[test]
    fn link_specs_are_consumed_in_creation_order() {
        let mut network = Network::with_seed(1);
        network
            .create_network("1;-2", Some("w100;x10;w1000"))
            .unwrap();
        let links = network.links();
        assert_eq!(links[0].link.medium(), Medium::Wired);
        assert_eq!(links[0].link.speed(), 100);
        // both directed entries share the link value
        assert_eq!(links[2].link, links[3].link);
        assert_eq!(links[2].link.medium(), Medium::Wireless);
        assert_eq!(links[4].link.speed(), 1000);
    }

    #[test]
    fn link_spec_length_mismatch_is_rejected() {
        let mut network = Network::with_seed(1);
        assert!(matches!(
            network.create_network("1;-2", Some("w100;w100")),
            Err(NetworkError::LinkDescription(_))
        ));
        assert!(matches!(
            network.create_network("1;-2", Some("w100;w100;w100;w100")),
            Err(NetworkError::LinkDescription(_))
        ));
    }

    #[test]
    fn description_round_trips_structurally() {
        for description in ["1;-2;0", "3;-2;1;-1;2;0;-1", "2;0;-1", "-4", "0"] {
            let mut first = Network::with_seed(1);
            first.create_network(description, None).unwrap();
            let rederived = first
                .description_tokens()
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(";");
            let mut second = Network::with_seed(1);
            second.create_network(&rederived, None).unwrap();
            assert_eq!(first.shape(), second.shape(), "description {}", description);
        }
    }
}
