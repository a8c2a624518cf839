use crate::{model_profile::ModelProfile, path::PathNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A model profile file. One species per file.
#[derive(Debug, Deserialize)]
pub struct ModelFile {
    pub schema_version: Option<String>,
    pub model: ModelProfile,
}

/// Column-oriented path snapshot: one column per exudate, each holding the
/// node sequences that reach every destination from that exudate.
pub type PathSnapshotFile = BTreeMap<String, Vec<Vec<PathNode>>>;

/// Written next to the run artifacts so a run can be traced back to its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub trophinet_version: String,
    pub stage: String,
    pub started_at: String,
    pub config_file: String,
}
