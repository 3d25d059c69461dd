//! Core model types.
//!
//! This file contains the node, link, frame and dependency types shared by
//! the builder, resolver and traffic generator. Links are addressed by their
//! position in the flat registry (the link index), not by node pairs.

use serde::{Deserialize, Serialize};

use crate::network::NetworkError;

/// Default speed assigned to links when no link description is supplied.
pub const REFERENCE_SPEED: u32 = 100;

/// Smallest valid Ethernet frame size in bytes.
pub const MIN_FRAME_SIZE: u32 = 72;

/// Largest valid Ethernet frame size in bytes.
pub const MAX_FRAME_SIZE: u32 = 1526;

/// Kind of a graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Internal forwarding node with no traffic of its own
    Switch,
    /// Traffic-originating/terminating node at the network edge
    EndSystem,
}

/// A vertex in the topology graph.
///
/// Node identity is positional: a node's id is its index in the network's
/// node registry. A switch may be reclassified to an end-system exactly once
/// (terminal leaf); the transition is never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_end_system(&self) -> bool {
        self.kind == NodeKind::EndSystem
    }

    /// One-way switch to end-system transition used by the builder when a
    /// `0` token terminates a childless switch.
    pub(crate) fn reclassify_to_end_system(&mut self) {
        self.kind = NodeKind::EndSystem;
    }
}

/// Transmission medium of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    /// Wired Ethernet segment
    Wired,
    /// Wireless segment subject to collision domains
    Wireless,
}

/// Speed and medium of one physical link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    speed: u32,
    medium: Medium,
}

impl Link {
    /// Create a link description. The speed must be a positive integer.
    pub fn new(speed: u32, medium: Medium) -> Result<Self, NetworkError> {
        if speed == 0 {
            return Err(NetworkError::Validation(
                "link speed must be a positive integer".to_string(),
            ));
        }
        Ok(Self { speed, medium })
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }
}

impl Default for Link {
    /// Standard link: wired at the reference speed.
    fn default() -> Self {
        Self {
            speed: REFERENCE_SPEED,
            medium: Medium::Wired,
        }
    }
}

/// One directed entry in the flat link registry.
///
/// An undirected physical link is stored as two consecutive directed
/// entries sharing one [`Link`] value. The entry's position in the registry
/// is its link index, which is the addressing unit used by paths, splits
/// and collision domains. The registry never reorders existing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkEntry {
    pub source: usize,
    pub destination: usize,
    pub link: Link,
}

/// One periodic time-triggered traffic flow.
///
/// A frame is sent from one end-system to one or more receiver end-systems.
/// The period and deadline are expressed in the same time unit; the deadline
/// is absolute and never exceeds the period. The size is constrained to the
/// Ethernet standard range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    sender: usize,
    receivers: Vec<usize>,
    period: u32,
    deadline: u32,
    size: u32,
}

impl Frame {
    /// Default period used until parameters are assigned.
    const DEFAULT_PERIOD: u32 = 10000;

    /// Create a frame with default period/deadline/size.
    ///
    /// The receivers list must be non-empty and must not contain the sender;
    /// the deadline defaults to the period and the size to the largest
    /// standard Ethernet frame.
    pub fn new(sender: usize, receivers: Vec<usize>) -> Result<Self, NetworkError> {
        if receivers.is_empty() {
            return Err(NetworkError::Validation(
                "a frame needs at least one receiver".to_string(),
            ));
        }
        if receivers.contains(&sender) {
            return Err(NetworkError::Validation(format!(
                "frame sender {} cannot be one of its receivers",
                sender
            )));
        }
        Ok(Self {
            sender,
            receivers,
            period: Self::DEFAULT_PERIOD,
            deadline: Self::DEFAULT_PERIOD,
            size: MAX_FRAME_SIZE,
        })
    }

    pub fn sender(&self) -> usize {
        self.sender
    }

    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    pub fn num_receivers(&self) -> usize {
        self.receivers.len()
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn deadline(&self) -> u32 {
        self.deadline
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Set the period. The deadline is pulled down to the new period if it
    /// would otherwise exceed it, keeping `deadline <= period` at all times.
    pub fn set_period(&mut self, period: u32) -> Result<(), NetworkError> {
        if period == 0 {
            return Err(NetworkError::Validation(
                "frame period must be a positive integer".to_string(),
            ));
        }
        self.period = period;
        if self.deadline > period {
            self.deadline = period;
        }
        Ok(())
    }

    /// Set the deadline; it must satisfy `0 < deadline <= period`.
    pub fn set_deadline(&mut self, deadline: u32) -> Result<(), NetworkError> {
        if deadline == 0 || deadline > self.period {
            return Err(NetworkError::Validation(format!(
                "frame deadline must be in (0, {}], got {}",
                self.period, deadline
            )));
        }
        self.deadline = deadline;
        Ok(())
    }

    /// Set the size in bytes, constrained to the Ethernet standard range.
    pub fn set_size(&mut self, size: u32) -> Result<(), NetworkError> {
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&size) {
            return Err(NetworkError::Validation(format!(
                "frame size must be between {} and {} bytes, got {}",
                MIN_FRAME_SIZE, MAX_FRAME_SIZE, size
            )));
        }
        self.size = size;
        Ok(())
    }
}

/// Timing relation between the end of one frame's path and another's.
///
/// A dependency constrains the successor (frame, link) pair to start no
/// earlier than `waiting_time` after the predecessor (frame, link) pair
/// and/or to be received within `deadline_time` of it. At least one of the
/// two times must be strictly positive, and when both are, the waiting time
/// may not exceed the deadline time. Dependencies are consumed by the
/// downstream scheduler; the sweep driver never generates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dependency {
    predecessor_frame: usize,
    predecessor_link: usize,
    successor_frame: usize,
    successor_link: usize,
    waiting_time: u32,
    deadline_time: u32,
}

impl Dependency {
    pub fn new(
        predecessor_frame: usize,
        predecessor_link: usize,
        successor_frame: usize,
        successor_link: usize,
        waiting_time: u32,
        deadline_time: u32,
    ) -> Result<Self, NetworkError> {
        if waiting_time == 0 && deadline_time == 0 {
            return Err(NetworkError::Validation(
                "at least one of waiting time and deadline time must be greater than 0"
                    .to_string(),
            ));
        }
        if deadline_time != 0 && waiting_time > deadline_time {
            return Err(NetworkError::Validation(format!(
                "dependency waiting time {} exceeds its deadline time {}",
                waiting_time, deadline_time
            )));
        }
        Ok(Self {
            predecessor_frame,
            predecessor_link,
            successor_frame,
            successor_link,
            waiting_time,
            deadline_time,
        })
    }

    pub fn predecessor_frame(&self) -> usize {
        self.predecessor_frame
    }

    pub fn predecessor_link(&self) -> usize {
        self.predecessor_link
    }

    pub fn successor_frame(&self) -> usize {
        self.successor_frame
    }

    pub fn successor_link(&self) -> usize {
        self.successor_link
    }

    pub fn waiting_time(&self) -> u32 {
        self.waiting_time
    }

    pub fn deadline_time(&self) -> u32 {
        self.deadline_time
    }
}
