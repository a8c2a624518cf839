//! Record types for the reference tables supplied by the user.

use serde::{Deserialize, Serialize};

/// An entry in the organic compound lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicCompound {
    pub compound: String,
    #[serde(default)]
    pub formula: Option<String>,
}

/// A differential-abundance score for one GSMM. The score may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaRecord {
    #[serde(rename = "GSMM")]
    pub gsmm: String,
    #[serde(rename = "DA_final_score", default)]
    pub score: Option<String>,
}

/// A single root exudate compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExudateRecord {
    pub metabolite: String,
}
