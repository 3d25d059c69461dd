//! Frame and parameter generation.
//!
//! Frames are instantiated by sampling a frame type from a weighted
//! distribution and choosing receivers accordingly; parameters are then
//! assigned from correlated period/deadline/size buckets drawn with a
//! single weighted index per frame.

use log::info;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::network::types::{Frame, MAX_FRAME_SIZE, MIN_FRAME_SIZE};
use crate::network::{Network, NetworkError};

/// Relative weights of the four frame types.
///
/// The weights are relative: only their ratios matter, so they do not need
/// to sum to 1. At least one must be strictly positive and none may be
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTypeWeights {
    /// Frame addressed to every other end-system
    #[serde(default)]
    pub broadcast: f64,
    /// Frame addressed to exactly one other end-system
    #[serde(default)]
    pub single: f64,
    /// Frame addressed to a random non-empty subset of the others
    #[serde(default)]
    pub multicast: f64,
    /// Frame addressed to all end-systems at minimum path length
    #[serde(default)]
    pub locally: f64,
}

impl FrameTypeWeights {
    /// All frames broadcast; convenient for tests and smoke runs.
    pub fn broadcast_only() -> Self {
        Self {
            broadcast: 1.0,
            single: 0.0,
            multicast: 0.0,
            locally: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        let weights = [self.broadcast, self.single, self.multicast, self.locally];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(NetworkError::Validation(
                "frame type weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(NetworkError::Validation(
                "at least one frame type weight must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Frame types drawn from [`FrameTypeWeights`], in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Broadcast,
    Single,
    Multicast,
    Locally,
}

const FRAME_KINDS: [FrameKind; 4] = [
    FrameKind::Broadcast,
    FrameKind::Single,
    FrameKind::Multicast,
    FrameKind::Locally,
];

impl Network {
    /// Generate `count` frames, replacing any previously generated set.
    ///
    /// For each frame the sender is drawn uniformly from the end-systems
    /// and the frame type from the supplied weights. All frames start with
    /// default parameters until [`Network::add_frame_params`] assigns them.
    ///
    /// Locally-addressed frames need resolved paths to rank receivers by
    /// path length, so a positive `locally` weight requires
    /// [`Network::generate_paths`] to have run.
    pub fn generate_frames(
        &mut self,
        count: usize,
        weights: &FrameTypeWeights,
    ) -> Result<(), NetworkError> {
        weights.validate()?;
        if self.end_systems.len() < 2 {
            return Err(NetworkError::Validation(format!(
                "frame generation needs at least 2 end systems, the topology has {}",
                self.end_systems.len()
            )));
        }
        if weights.locally > 0.0 && self.paths.is_empty() {
            return Err(NetworkError::Validation(
                "locally addressed frames need resolved paths; call generate_paths first"
                    .to_string(),
            ));
        }

        let kind_dist = WeightedIndex::new([
            weights.broadcast,
            weights.single,
            weights.multicast,
            weights.locally,
        ])
        .map_err(|e| NetworkError::Validation(format!("invalid frame type weights: {}", e)))?;

        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            let sender = self.end_systems[self.rng.gen_range(0..self.end_systems.len())];
            let kind = FRAME_KINDS[kind_dist.sample(&mut self.rng)];
            let receivers = self.choose_receivers(sender, kind)?;
            frames.push(Frame::new(sender, receivers)?);
        }
        self.frames = frames;
        info!("Generated {} frame(s)", count);
        Ok(())
    }

    fn choose_receivers(
        &mut self,
        sender: usize,
        kind: FrameKind,
    ) -> Result<Vec<usize>, NetworkError> {
        let others: Vec<usize> = self
            .end_systems
            .iter()
            .copied()
            .filter(|&id| id != sender)
            .collect();
        match kind {
            FrameKind::Broadcast => Ok(others),
            FrameKind::Single => {
                let receiver = others.choose(&mut self.rng).copied().ok_or_else(|| {
                    NetworkError::Consistency(
                        "sender has no peers despite the end-system count check".to_string(),
                    )
                })?;
                Ok(vec![receiver])
            }
            FrameKind::Multicast => {
                let size = self.rng.gen_range(1..=others.len());
                Ok(others
                    .choose_multiple(&mut self.rng, size)
                    .copied()
                    .collect())
            }
            FrameKind::Locally => {
                // All end-systems tied for the minimum hop count from the
                // sender.
                let mut lengths = Vec::with_capacity(others.len());
                for &receiver in &others {
                    let path = self.paths.get(sender, receiver).ok_or_else(|| {
                        NetworkError::Consistency(format!(
                            "no resolved path from end system {} to {}",
                            sender, receiver
                        ))
                    })?;
                    lengths.push((receiver, path.len()));
                }
                let minimum = lengths
                    .iter()
                    .map(|&(_, len)| len)
                    .min()
                    .unwrap_or_default();
                Ok(lengths
                    .into_iter()
                    .filter(|&(_, len)| len == minimum)
                    .map(|(receiver, _)| receiver)
                    .collect())
            }
        }
    }

    /// Assign period, deadline and size to every generated frame.
    ///
    /// Per frame one bucket index is drawn from `period_weights` (relative
    /// weights over `periods`), and period, deadline fraction and size are
    /// all read at that same index so the values stay correlated. Without
    /// deadline fractions the deadline equals the period; with them the
    /// deadline is `period * fraction`, rounded and clamped into
    /// `[1, period]`. All list lengths and value ranges are checked before
    /// any frame is mutated.
    pub fn add_frame_params(
        &mut self,
        periods: &[u32],
        period_weights: &[f64],
        deadline_fractions: Option<&[f64]>,
        sizes: Option<&[u32]>,
    ) -> Result<(), NetworkError> {
        if periods.is_empty() {
            return Err(NetworkError::Validation(
                "at least one period is required".to_string(),
            ));
        }
        if periods.len() != period_weights.len() {
            return Err(NetworkError::Validation(format!(
                "{} period(s) but {} period weight(s)",
                periods.len(),
                period_weights.len()
            )));
        }
        if periods.iter().any(|&p| p == 0) {
            return Err(NetworkError::Validation(
                "periods must be positive integers".to_string(),
            ));
        }
        if let Some(fractions) = deadline_fractions {
            if fractions.len() != periods.len() {
                return Err(NetworkError::Validation(format!(
                    "{} period(s) but {} deadline fraction(s)",
                    periods.len(),
                    fractions.len()
                )));
            }
            if fractions.iter().any(|&f| !(f > 0.0 && f <= 1.0)) {
                return Err(NetworkError::Validation(
                    "deadline fractions must lie in (0, 1]".to_string(),
                ));
            }
        }
        if let Some(sizes) = sizes {
            if sizes.len() != periods.len() {
                return Err(NetworkError::Validation(format!(
                    "{} period(s) but {} size(s)",
                    periods.len(),
                    sizes.len()
                )));
            }
            if sizes
                .iter()
                .any(|&s| !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&s))
            {
                return Err(NetworkError::Validation(format!(
                    "sizes must lie in [{}, {}]",
                    MIN_FRAME_SIZE, MAX_FRAME_SIZE
                )));
            }
        }

        let bucket_dist = WeightedIndex::new(period_weights)
            .map_err(|e| NetworkError::Validation(format!("invalid period weights: {}", e)))?;

        for frame in &mut self.frames {
            let bucket = bucket_dist.sample(&mut self.rng);
            let period = periods[bucket];
            frame.set_period(period)?;
            let deadline = match deadline_fractions {
                Some(fractions) => {
                    ((period as f64 * fractions[bucket]).round() as u32).clamp(1, period)
                }
                None => period,
            };
            frame.set_deadline(deadline)?;
            if let Some(sizes) = sizes {
                frame.set_size(sizes[bucket])?;
            }
        }
        info!(
            "Assigned parameters to {} frame(s) from {} bucket(s)",
            self.frames.len(),
            periods.len()
        );
        Ok(())
    }
}
