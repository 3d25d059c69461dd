//! Network model module.
//!
//! This module contains the owned [`Network`] aggregate and the algorithms
//! that operate on it: the grammar-driven topology builder, the tree path
//! resolver, the multicast split calculator, collision domain validation and
//! randomized traffic generation.

pub mod builder;
pub mod collision;
pub mod descriptor;
pub mod paths;
pub mod splits;
pub mod traffic;
pub mod types;

// Re-export key types and functions for easier access
pub use paths::PathMatrix;
pub use splits::compute_splits;
pub use traffic::FrameTypeWeights;
pub use types::{
    Dependency, Frame, Link, LinkEntry, Medium, Node, NodeKind, MAX_FRAME_SIZE, MIN_FRAME_SIZE,
    REFERENCE_SPEED,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Errors raised by the network core.
///
/// The taxonomy is strict: description errors are structural grammar
/// failures that abort the current build with no partial graph; validation
/// errors are range/type violations raised at the boundary of the offending
/// call; consistency errors indicate an internal defect and are never
/// user-actionable. There is no retry policy anywhere in the core.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Invalid network description: {0}")]
    Description(String),

    #[error("Invalid link description: {0}")]
    LinkDescription(String),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Internal consistency failure: {0}")]
    Consistency(String),
}

/// The network under construction: graph, registries and traffic.
///
/// A `Network` exclusively owns every registry it holds; nothing is shared
/// across instances. [`Network::create_network`] clears all owned state
/// before rebuilding, so a single instance can be reused across sweep
/// combinations without leaking links or frames from a previous run. The
/// random source is owned per instance and seeded at construction.
pub struct Network {
    /// All vertices; a node's id is its index here.
    pub(crate) nodes: Vec<Node>,
    /// Neighbor lists in link creation order, indexed by node id.
    pub(crate) adjacency: Vec<Vec<usize>>,
    /// Ids of nodes currently classified as switches.
    pub(crate) switches: Vec<usize>,
    /// Ids of nodes currently classified as end-systems.
    pub(crate) end_systems: Vec<usize>,
    /// Flat registry of directed link entries; position = link index.
    pub(crate) links: Vec<LinkEntry>,
    /// Resolved paths between ordered end-system pairs.
    pub(crate) paths: PathMatrix,
    /// Generated frames in creation order.
    pub(crate) frames: Vec<Frame>,
    /// Validated wireless collision domains (link index sets).
    pub(crate) collision_domains: Vec<Vec<usize>>,
    /// Scheduler dependencies attached to this network.
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) rng: StdRng,
}

impl Network {
    /// Create an empty network with a fresh entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty network with a deterministic random source.
    ///
    /// Two networks built with the same seed and the same sequence of calls
    /// produce identical frames and parameters.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            adjacency: Vec::new(),
            switches: Vec::new(),
            end_systems: Vec::new(),
            links: Vec::new(),
            paths: PathMatrix::default(),
            frames: Vec::new(),
            collision_domains: Vec::new(),
            dependencies: Vec::new(),
            rng,
        }
    }

    /// Clear every owned registry, keeping only the random source.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
        self.switches.clear();
        self.end_systems.clear();
        self.links.clear();
        self.paths = PathMatrix::default();
        self.frames.clear();
        self.collision_domains.clear();
        self.dependencies.clear();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of the switches, in creation order.
    pub fn switches(&self) -> &[usize] {
        &self.switches
    }

    /// Ids of the end-systems, in the order they became end-systems.
    pub fn end_systems(&self) -> &[usize] {
        &self.end_systems
    }

    /// The flat directed link registry. Two consecutive entries per
    /// physical link; an entry's position is its link index.
    pub fn links(&self) -> &[LinkEntry] {
        &self.links
    }

    pub fn paths(&self) -> &PathMatrix {
        &self.paths
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn collision_domains(&self) -> &[Vec<usize>] {
        &self.collision_domains
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Attach a scheduler dependency to this network.
    ///
    /// The referenced frames and links must exist; the timing invariants are
    /// enforced by [`Dependency::new`].
    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<(), NetworkError> {
        for (label, frame) in [
            ("predecessor", dependency.predecessor_frame()),
            ("successor", dependency.successor_frame()),
        ] {
            if frame >= self.frames.len() {
                return Err(NetworkError::Validation(format!(
                    "dependency {} frame {} does not exist ({} frames)",
                    label,
                    frame,
                    self.frames.len()
                )));
            }
        }
        for (label, link) in [
            ("predecessor", dependency.predecessor_link()),
            ("successor", dependency.successor_link()),
        ] {
            if link >= self.links.len() {
                return Err(NetworkError::Validation(format!(
                    "dependency {} link index {} does not exist ({} link entries)",
                    label,
                    link,
                    self.links.len()
                )));
            }
        }
        self.dependencies.push(dependency);
        Ok(())
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
