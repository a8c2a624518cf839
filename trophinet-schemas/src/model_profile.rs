//! Defines the data structures for a species' precomputed metabolic profile.
//! A profile stands in for a full genome-scale model: it lists the exchanges the
//! species owns, the conditions under which it grows, and the flux ranges it
//! secretes once growing.

use serde::{Deserialize, Serialize};

/// The growth behaviour of a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSpec {
    /// Optimal growth rate (1/h) when every required exchange is available.
    pub rate: f64,
    /// Exchanges that must all be present in the assigned medium for growth.
    #[serde(default)]
    pub requires: Vec<String>,
}

/// A secretion flux range reported by variability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretionSpec {
    /// Exchange reaction identifier of the secreted compound.
    pub exchange: String,
    /// Minimum flux. Negative values mark net secretion.
    pub lower: f64,
    /// Maximum flux.
    #[serde(default)]
    pub upper: f64,
    /// Exchanges that must be present in the assigned medium for this secretion to occur.
    #[serde(default)]
    pub when: Vec<String>,
}

/// The top-level struct representing one species' model profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub model_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Every exchange reaction the model holds.
    pub exchanges: Vec<String>,
    pub growth: GrowthSpec,
    #[serde(default)]
    pub secretions: Vec<SecretionSpec>,
}
