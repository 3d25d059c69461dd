//! Sweep configuration structures and YAML parsing.
//!
//! A sweep configuration lists the variant axes the orchestrator combines:
//! topology descriptions, frame counts, traffic mixes and period sets.
//! Validation applies the same rules the core applies at build time, so a
//! bad configuration fails before any combination runs.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use color_eyre::Result;
use log::info;

use crate::network::{FrameTypeWeights, MAX_FRAME_SIZE, MIN_FRAME_SIZE};

/// One topology variant: a network description and optional link specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyVariant {
    /// Pre-order tree description, e.g. `"3;-2;1;-1;2;0;-1"`
    pub network: String,
    /// Per-link `{w|x}<speed>` specs in creation order; omitted means all
    /// links wired at the reference speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,
}

/// One period/deadline/size bucket set.
///
/// The lists are parallel: bucket `i` pairs `periods[i]` with
/// `weights[i]`, `deadline_fractions[i]` and `sizes[i]`, so one weighted
/// draw keys every per-frame parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSet {
    pub periods: Vec<u32>,
    pub weights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_fractions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<u32>>,
}

/// Sweep configuration over which the orchestrator iterates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub topologies: Vec<TopologyVariant>,
    /// Collision domains applied to every topology variant
    #[serde(default)]
    pub collision_domains: Vec<Vec<usize>>,
    pub frame_counts: Vec<usize>,
    pub traffic_mixes: Vec<FrameTypeWeights>,
    pub period_sets: Vec<PeriodSet>,
}

/// Errors raised while validating a sweep configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),

    #[error("Invalid traffic configuration: {0}")]
    InvalidTraffic(String),

    #[error("Invalid period configuration: {0}")]
    InvalidPeriods(String),
}

impl Config {
    /// Validate the configuration before any combination runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topologies.is_empty() {
            return Err(ValidationError::InvalidTopology(
                "at least one topology variant is required".to_string(),
            ));
        }
        for variant in &self.topologies {
            if variant.network.trim().is_empty() {
                return Err(ValidationError::InvalidTopology(
                    "network description cannot be empty".to_string(),
                ));
            }
            if let Some(links) = &variant.links {
                if links.trim().is_empty() {
                    return Err(ValidationError::InvalidTopology(
                        "link description cannot be an empty string; omit it instead".to_string(),
                    ));
                }
            }
        }

        if self.frame_counts.is_empty() {
            return Err(ValidationError::InvalidTraffic(
                "at least one frame count is required".to_string(),
            ));
        }
        if self.frame_counts.iter().any(|&count| count == 0) {
            return Err(ValidationError::InvalidTraffic(
                "frame counts must be positive".to_string(),
            ));
        }

        if self.traffic_mixes.is_empty() {
            return Err(ValidationError::InvalidTraffic(
                "at least one traffic mix is required".to_string(),
            ));
        }
        for mix in &self.traffic_mixes {
            mix.validate()
                .map_err(|e| ValidationError::InvalidTraffic(e.to_string()))?;
        }

        if self.period_sets.is_empty() {
            return Err(ValidationError::InvalidPeriods(
                "at least one period set is required".to_string(),
            ));
        }
        for set in &self.period_sets {
            Self::validate_period_set(set)?;
        }
        Ok(())
    }

    fn validate_period_set(set: &PeriodSet) -> Result<(), ValidationError> {
        if set.periods.is_empty() {
            return Err(ValidationError::InvalidPeriods(
                "a period set needs at least one period".to_string(),
            ));
        }
        if set.periods.iter().any(|&p| p == 0) {
            return Err(ValidationError::InvalidPeriods(
                "periods must be positive integers".to_string(),
            ));
        }
        if set.weights.len() != set.periods.len() {
            return Err(ValidationError::InvalidPeriods(format!(
                "{} period(s) but {} weight(s)",
                set.periods.len(),
                set.weights.len()
            )));
        }
        if set.weights.iter().any(|&w| !w.is_finite() || w < 0.0)
            || set.weights.iter().sum::<f64>() <= 0.0
        {
            return Err(ValidationError::InvalidPeriods(
                "period weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if let Some(fractions) = &set.deadline_fractions {
            if fractions.len() != set.periods.len() {
                return Err(ValidationError::InvalidPeriods(format!(
                    "{} period(s) but {} deadline fraction(s)",
                    set.periods.len(),
                    fractions.len()
                )));
            }
            if fractions.iter().any(|&f| !(f > 0.0 && f <= 1.0)) {
                return Err(ValidationError::InvalidPeriods(
                    "deadline fractions must lie in (0, 1]".to_string(),
                ));
            }
        }
        if let Some(sizes) = &set.sizes {
            if sizes.len() != set.periods.len() {
                return Err(ValidationError::InvalidPeriods(format!(
                    "{} period(s) but {} size(s)",
                    set.periods.len(),
                    sizes.len()
                )));
            }
            if sizes
                .iter()
                .any(|&s| !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&s))
            {
                return Err(ValidationError::InvalidPeriods(format!(
                    "frame sizes must lie in [{}, {}]",
                    MIN_FRAME_SIZE, MAX_FRAME_SIZE
                )));
            }
        }
        Ok(())
    }
}

/// Load and parse a sweep configuration from a YAML file.
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)?;
    let config: Config = serde_yaml::from_reader(file)?;
    config.validate()?;

    info!(
        "Configuration: {} topology variant(s), {} frame count(s), {} traffic mix(es), {} period set(s)",
        config.topologies.len(),
        config.frame_counts.len(),
        config.traffic_mixes.len(),
        config.period_sets.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Config {
        Config {
            topologies: vec![TopologyVariant {
                network: "2;-2;-2".to_string(),
                links: None,
            }],
            collision_domains: vec![],
            frame_counts: vec![10],
            traffic_mixes: vec![FrameTypeWeights::broadcast_only()],
            period_sets: vec![PeriodSet {
                periods: vec![5000, 10000],
                weights: vec![0.5, 0.5],
                deadline_fractions: Some(vec![0.8, 0.5]),
                sizes: Some(vec![1000, 1400]),
            }],
        }
    }

    #[test]
    fn minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn empty_axes_are_rejected() {
        let mut config = minimal_config();
        config.topologies.clear();
        assert!(config.validate().is_err());

        let mut config = minimal_config();
        config.frame_counts = vec![0];
        assert!(config.validate().is_err());

        let mut config = minimal_config();
        config.period_sets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn mismatched_period_lists_are_rejected() {
        let mut config = minimal_config();
        config.period_sets[0].weights = vec![1.0];
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPeriods(_))
        ));

        let mut config = minimal_config();
        config.period_sets[0].deadline_fractions = Some(vec![0.5]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_sum_traffic_mix_is_rejected() {
        let mut config = minimal_config();
        config.traffic_mixes = vec![FrameTypeWeights {
            broadcast: 0.0,
            single: 0.0,
            multicast: 0.0,
            locally: 0.0,
        }];
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTraffic(_))
        ));
    }

    #[test]
    fn out_of_range_deadline_fraction_is_rejected() {
        let mut config = minimal_config();
        config.period_sets[0].deadline_fractions = Some(vec![0.8, 1.5]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_yaml_round_trip() {
        let yaml = r#"
topologies:
  - network: "3;-2;1;-1;2;0;-1"
    links: "w100;w100;w100;w100;w100;w100;x100;w100;w100;w100"
collision_domains:
  - [12, 13]
frame_counts: [10]
traffic_mixes:
  - broadcast: 0.0
    single: 0.5
    multicast: 0.5
    locally: 0.0
period_sets:
  - periods: [5000, 10000]
    weights: [0.5, 0.5]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision_domains, vec![vec![12, 13]]);
        assert_eq!(config.topologies[0].network, "3;-2;1;-1;2;0;-1");
        assert!(config.period_sets[0].deadline_fractions.is_none());
    }
}
