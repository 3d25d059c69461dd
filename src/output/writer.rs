//! Content-addressed record persistence.
//!
//! Each experiment combination is written under a directory named by a
//! 16-hex-digit hash of its canonical parameter tuple, holding the YAML
//! record (`network.yaml`) and the JSON parameter tuple that produced it
//! (`params.json`). Re-running the same sweep overwrites the same
//! directories, so sweeps are idempotent on disk.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::debug;
use serde::Serialize;

use crate::output::record::ExperimentRecord;

/// Hash a canonical parameter tuple string into a directory name.
pub fn experiment_hash(parameter_tuple: &str) -> String {
    let mut hasher = DefaultHasher::new();
    parameter_tuple.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Persist one experiment record and its parameter tuple.
///
/// Creates `<output_dir>/<name>/` and writes `network.yaml` and
/// `params.json` into it, returning the experiment directory.
pub fn write_record<P: Serialize>(
    output_dir: &Path,
    name: &str,
    record: &ExperimentRecord,
    params: &P,
) -> Result<PathBuf> {
    let experiment_dir = output_dir.join(name);
    fs::create_dir_all(&experiment_dir).wrap_err_with(|| {
        format!(
            "Failed to create experiment directory '{}'",
            experiment_dir.display()
        )
    })?;

    let record_path = experiment_dir.join("network.yaml");
    let yaml = serde_yaml::to_string(record).wrap_err("Failed to serialize experiment record")?;
    fs::write(&record_path, yaml)
        .wrap_err_with(|| format!("Failed to write '{}'", record_path.display()))?;

    let params_path = experiment_dir.join("params.json");
    let json = serde_json::to_string_pretty(params)
        .wrap_err("Failed to serialize experiment parameters")?;
    fs::write(&params_path, json)
        .wrap_err_with(|| format!("Failed to write '{}'", params_path.display()))?;

    debug!("Wrote experiment record to {}", experiment_dir.display());
    Ok(experiment_dir)
}
