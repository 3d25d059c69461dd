//! Experiment record structures.
//!
//! The record is the produced interface towards the serialization
//! collaborator: a network parameter summary, the collision domains, one
//! entry per physical link and one entry per frame with its per-receiver
//! paths and split groups. Link-index lists are serialized as
//! semicolon-joined strings, matching the description grammar.

use serde::Serialize;

use crate::network::{compute_splits, Dependency, Medium, Network, NetworkError};

/// Network-wide parameter summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    /// Number of generated frames
    pub num_frames: usize,
    /// Number of directed entries in the link registry
    pub num_links: usize,
}

/// Speed and medium of one directed link entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub speed: u32,
    pub medium: Medium,
}

/// One frame with its resolved paths and split groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    pub period: u32,
    pub deadline: u32,
    pub size: u32,
    /// One semicolon-joined link-index list per receiver, in receiver order
    pub paths: Vec<String>,
    /// One semicolon-joined link-index list per branch group
    pub splits: Vec<String>,
}

/// The full record handed to the serialization collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentRecord {
    pub network: NetworkSummary,
    pub collision_domains: Vec<String>,
    pub links: Vec<LinkRecord>,
    pub frames: Vec<FrameRecord>,
    /// Scheduler dependencies attached to the network, if any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl ExperimentRecord {
    /// Assemble the record for a fully generated network.
    ///
    /// Splits are derived here, per frame, from the already-resolved
    /// receiver paths. A frame whose paths were never resolved indicates a
    /// pipeline defect and fails with a consistency error.
    pub fn from_network(network: &Network) -> Result<Self, NetworkError> {
        let links = network
            .links()
            .iter()
            .map(|entry| LinkRecord {
                speed: entry.link.speed(),
                medium: entry.link.medium(),
            })
            .collect();

        let mut frames = Vec::with_capacity(network.frames().len());
        for frame in network.frames() {
            let mut receiver_paths = Vec::with_capacity(frame.num_receivers());
            for &receiver in frame.receivers() {
                let path = network.paths().get(frame.sender(), receiver).ok_or_else(|| {
                    NetworkError::Consistency(format!(
                        "frame from {} to {} has no resolved path",
                        frame.sender(),
                        receiver
                    ))
                })?;
                receiver_paths.push(path);
            }
            let splits = compute_splits(&receiver_paths);
            frames.push(FrameRecord {
                period: frame.period(),
                deadline: frame.deadline(),
                size: frame.size(),
                paths: receiver_paths.iter().map(|path| join_indices(path)).collect(),
                splits: splits.iter().map(|group| join_indices(group)).collect(),
            });
        }

        Ok(Self {
            network: NetworkSummary {
                num_frames: network.frames().len(),
                num_links: network.links().len(),
            },
            collision_domains: network
                .collision_domains()
                .iter()
                .map(|domain| join_indices(domain))
                .collect(),
            links,
            frames,
            dependencies: network.dependencies().to_vec(),
        })
    }
}

/// Join link indices with semicolons, the list form used throughout the
/// textual interfaces.
fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::FrameTypeWeights;

    fn generated_network() -> Network {
        let mut network = Network::with_seed(5);
        network
            .create_network("1;-2", Some("x100;x100;w100"))
            .unwrap();
        network.define_collision_domains(&[vec![0, 2]]).unwrap();
        network.generate_paths().unwrap();
        network
            .generate_frames(4, &FrameTypeWeights::broadcast_only())
            .unwrap();
        network
            .add_frame_params(&[5000], &[1.0], Some(&[0.5]), Some(&[100]))
            .unwrap();
        network
    }

    #[test]
    fn record_reflects_network_counts() {
        let network = generated_network();
        let record = ExperimentRecord::from_network(&network).unwrap();
        assert_eq!(record.network.num_frames, 4);
        assert_eq!(record.network.num_links, 6);
        assert_eq!(record.links.len(), 6);
        assert_eq!(record.frames.len(), 4);
        assert_eq!(record.collision_domains, vec!["0;2".to_string()]);
    }

    #[test]
    fn frame_records_join_paths_and_splits() {
        let network = generated_network();
        let record = ExperimentRecord::from_network(&network).unwrap();
        for (frame, frame_record) in network.frames().iter().zip(&record.frames) {
            assert_eq!(frame_record.paths.len(), frame.num_receivers());
            assert_eq!(frame_record.period, 5000);
            assert_eq!(frame_record.deadline, 2500);
            assert_eq!(frame_record.size, 100);
            for path in &frame_record.paths {
                assert!(path.split(';').all(|tok| tok.parse::<usize>().is_ok()));
            }
        }
    }

    #[test]
    fn sibling_broadcast_splits_at_shared_switch() {
        // Two receivers under one switch: paths diverge at the second hop,
        // after the shared sender-to-switch link.
        let mut network = Network::with_seed(5);
        network.create_network("1;-3", None).unwrap();
        network.generate_paths().unwrap();
        network
            .generate_frames(1, &FrameTypeWeights::broadcast_only())
            .unwrap();
        let record = ExperimentRecord::from_network(&network).unwrap();
        assert_eq!(record.frames[0].splits.len(), 1);
        assert_eq!(record.frames[0].splits[0].split(';').count(), 2);
    }

    #[test]
    fn dependencies_appear_in_the_record_only_when_present() {
        let network = generated_network();
        let record = ExperimentRecord::from_network(&network).unwrap();
        assert!(record.dependencies.is_empty());
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(!yaml.contains("dependencies"));

        let mut network = generated_network();
        let dependency = Dependency::new(0, 0, 1, 1, 100, 200).unwrap();
        network.add_dependency(dependency).unwrap();
        let record = ExperimentRecord::from_network(&network).unwrap();
        assert_eq!(record.dependencies, vec![dependency]);
    }

    #[test]
    fn record_serializes_to_yaml() {
        let network = generated_network();
        let record = ExperimentRecord::from_network(&network).unwrap();
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("num_frames: 4"));
        assert!(yaml.contains("medium: wireless"));
    }
}
