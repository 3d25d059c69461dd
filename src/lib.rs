//! # ttnetgen - Time-triggered network topology and traffic generator
//!
//! This library synthesizes artificial switch/end-system network topologies
//! and the time-triggered traffic (frames) that traverses them, producing
//! structured experiment records for offline schedulers.
//!
//! ## Overview
//!
//! Topologies are described with a compact pre-order grammar
//! (`"3;-2;1;-1;2;0;-1"`), optionally paired with per-link medium/speed
//! specs (`"w100;x10;..."`). From the built tree the library resolves the
//! unique path between every ordered pair of end-systems, encoded as link
//! registry indices, and derives per-frame multicast split points. Frames
//! are instantiated from weighted type distributions and parameterized from
//! correlated period/deadline/size buckets.
//!
//! ## Architecture
//!
//! - `config`: sweep configuration structures and YAML parsing
//! - `network`: the core model: builder, path resolver, split calculator,
//!   collision domains, and traffic generation
//! - `output`: experiment record structures and content-addressed persistence
//! - `orchestrator`: cartesian sweep over configuration variants
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ttnetgen::network::{FrameTypeWeights, Network};
//!
//! let mut network = Network::new();
//! network.create_network("2;-2;-2", None)?;
//! network.generate_paths()?;
//! network.generate_frames(10, &FrameTypeWeights::broadcast_only())?;
//! network.add_frame_params(&[5000, 10000], &[0.5, 0.5], None, None)?;
//! # Ok::<(), ttnetgen::network::NetworkError>(())
//! ```
//!
//! ## Error Handling
//!
//! Core operations return typed `thiserror` errors (`NetworkError`,
//! `ValidationError`); the orchestration layer wraps them into
//! `color_eyre::Result` with context. No operation ever returns a partially
//! built structure: a failed build leaves nothing usable behind.

pub mod config;
pub mod network;
pub mod orchestrator;
pub mod output;
