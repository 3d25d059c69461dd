//! Collision domain definition and validation.
//!
//! A collision domain groups wireless links that share a frequency band and
//! therefore interfere with each other. Domains are validated eagerly and
//! stored as opaque link-index sets for downstream constraint propagation;
//! the core never evaluates them further.

use log::info;

use crate::network::types::Medium;
use crate::network::{Network, NetworkError};

impl Network {
    /// Define the collision domains for this network, replacing any
    /// previously defined set.
    ///
    /// Every referenced link index must resolve to a wireless-medium entry
    /// in the link registry; a wired or out-of-range reference fails the
    /// whole call before anything is stored. Indices are taken exactly as
    /// supplied.
    pub fn define_collision_domains(
        &mut self,
        domains: &[Vec<usize>],
    ) -> Result<(), NetworkError> {
        for (domain_index, domain) in domains.iter().enumerate() {
            for &link_index in domain {
                let entry = self.links.get(link_index).ok_or_else(|| {
                    NetworkError::Validation(format!(
                        "collision domain {} references link index {} but the registry has {} entries",
                        domain_index,
                        link_index,
                        self.links.len()
                    ))
                })?;
                if entry.link.medium() != Medium::Wireless {
                    return Err(NetworkError::Validation(format!(
                        "collision domain {} references link index {} which is wired; only wireless links share a collision domain",
                        domain_index, link_index
                    )));
                }
            }
        }
        self.collision_domains = domains.to_vec();
        if !domains.is_empty() {
            info!("Defined {} collision domain(s)", domains.len());
        }
        Ok(())
    }
}
